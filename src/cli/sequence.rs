//! Sequence number CLI commands

use clap::Subcommand;

use super::open_workspace;
use crate::config::Settings;
use crate::display::format_sequence_report;
use crate::error::CommitmentResult;
use crate::storage::Storage;

/// Sequence subcommands
#[derive(Subcommand)]
pub enum SequenceCommands {
    /// Report duplicates, missing numbers and gaps
    Check,
    /// Reassign 1..N in creation order
    Renumber {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_sequence_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SequenceCommands,
) -> CommitmentResult<()> {
    let mut workspace = open_workspace(storage, settings)?;

    match cmd {
        SequenceCommands::Check => {
            print!("{}", format_sequence_report(&workspace.check_sequences()));
        }

        SequenceCommands::Renumber { force } => {
            if !force {
                println!(
                    "This will renumber all {} record(s) by creation time.",
                    workspace.records().len()
                );
                println!("To proceed, run again with --force flag:");
                println!("  commitments sequence renumber --force");
                return Ok(());
            }

            let result = workspace.renumber()?;
            println!(
                "Renumbered {} of {} record(s).",
                result.records_renumbered,
                workspace.records().len()
            );
        }
    }

    Ok(())
}
