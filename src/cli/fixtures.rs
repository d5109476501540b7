//! Fixture generation commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::CommitmentResult;
use crate::fixtures::{generate_fixtures, validate_fixtures, RESULTS_FILE, VALIDATION_RESULTS_FILE};

/// Fixture subcommands
#[derive(Subcommand)]
pub enum FixturesCommands {
    /// Write the TEST_00N_*.xml series
    Generate {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Records in the initial file (defaults to the configured count)
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Re-read every TEST_*.xml file and write a JSON report
    Validate {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

pub fn handle_fixtures_command(settings: &Settings, cmd: FixturesCommands) -> CommitmentResult<()> {
    match cmd {
        FixturesCommands::Generate { dir, count } => {
            let count = count.unwrap_or(settings.fixture_record_count);
            let files = generate_fixtures(&dir, count)?;
            for file in &files {
                println!("  {:<28}  {}", file.name, file.note);
            }
            println!();
            println!(
                "Wrote {} file(s) and {} to: {}",
                files.len(),
                RESULTS_FILE,
                dir.display()
            );
        }

        FixturesCommands::Validate { dir } => {
            let reports = validate_fixtures(&dir)?;
            println!(
                "{:<28}  {:>6}  {:>6}  {:>7}  {:>4}  {:>8}  {:>6}  {}",
                "File", "Total", "Urgent", "Missing", "Dups", "Amounts", "Dates", "Gaps"
            );
            println!(
                "{:-<28}  {:->6}  {:->6}  {:->7}  {:->4}  {:->8}  {:->6}  {:-<4}",
                "", "", "", "", "", "", "", ""
            );
            for r in &reports {
                println!(
                    "{:<28}  {:>6}  {:>6}  {:>7}  {:>4}  {:>8}  {:>6}  {}",
                    r.file,
                    r.total,
                    r.urgent,
                    r.missing_fields,
                    r.duplicates,
                    r.invalid_amounts,
                    r.invalid_dates,
                    if r.sequence_gaps { "yes" } else { "no" }
                );
            }
            println!();
            println!("Report written to: {}", dir.join(VALIDATION_RESULTS_FILE).display());
        }
    }

    Ok(())
}
