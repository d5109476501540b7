//! Header CLI commands

use clap::Subcommand;

use super::open_workspace;
use crate::config::Settings;
use crate::display::format_header;
use crate::error::CommitmentResult;
use crate::models::HeaderPatch;
use crate::services::validation::validate_header;
use crate::storage::Storage;

/// Header subcommands
#[derive(Subcommand)]
pub enum HeaderCommands {
    /// Show the current header
    Show,
    /// Set one or more header fields
    Set {
        #[arg(long)]
        reason_code: Option<String>,
        #[arg(long)]
        budget_year: Option<String>,
        #[arg(long)]
        budget_user_id: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        treasury: Option<String>,
    },
}

pub fn handle_header_command(
    storage: &Storage,
    settings: &Settings,
    cmd: HeaderCommands,
) -> CommitmentResult<()> {
    let mut workspace = open_workspace(storage, settings)?;

    match cmd {
        HeaderCommands::Show => {
            print!("{}", format_header(workspace.header()));
        }

        HeaderCommands::Set {
            reason_code,
            budget_year,
            budget_user_id,
            currency,
            treasury,
        } => {
            let patch = HeaderPatch {
                cumulative_reason_code: reason_code,
                budget_year,
                budget_user_id,
                currency_code: currency,
                treasury,
            };
            if patch.is_empty() {
                println!("No changes specified. Use --help to see the header fields.");
                return Ok(());
            }

            let header = patch.apply(workspace.header());
            workspace.set_header(header)?;
            print!("{}", format_header(workspace.header()));

            let missing = validate_header(workspace.header());
            if !missing.is_empty() {
                println!();
                for error in missing {
                    println!("Warning: {}", error);
                }
            }
        }
    }

    Ok(())
}
