//! XML import/export CLI commands

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use super::open_workspace;
use crate::config::Settings;
use crate::display::{format_validation_errors, format_xml_comparison, format_xml_summary};
use crate::error::{CommitmentError, CommitmentResult};
use crate::storage::Storage;
use crate::xml::{compare, export_filename, parse_xml, summarize};

/// XML subcommands
#[derive(Subcommand)]
pub enum XmlCommands {
    /// Export header and records (refused while validation fails)
    Export {
        /// Output file (defaults to commitments_<date>.xml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace header and records with the contents of a file
    Import {
        file: PathBuf,
        /// Skip confirmation when records would be replaced
        #[arg(long)]
        force: bool,
    },
    /// Summarize an exported file on its own
    Verify {
        file: PathBuf,
    },
    /// Compare an exported file with the current records
    Compare {
        file: PathBuf,
    },
}

fn read_file(path: &PathBuf) -> CommitmentResult<String> {
    fs::read_to_string(path).map_err(|e| {
        CommitmentError::Io(format!("Failed to read {}: {}", path.display(), e))
    })
}

pub fn handle_xml_command(
    storage: &Storage,
    settings: &Settings,
    cmd: XmlCommands,
) -> CommitmentResult<()> {
    let mut workspace = open_workspace(storage, settings)?;

    match cmd {
        XmlCommands::Export { output } => {
            let xml = match workspace.export_xml() {
                Ok(xml) => xml,
                Err(err) => {
                    if let Some(errors) = err.validation_errors() {
                        eprint!("{}", format_validation_errors(errors));
                    }
                    return Err(err);
                }
            };

            let output =
                output.unwrap_or_else(|| PathBuf::from(export_filename(Local::now().date_naive())));
            fs::write(&output, xml).map_err(|e| {
                CommitmentError::Export(format!(
                    "Failed to write {}: {}",
                    output.display(),
                    e
                ))
            })?;
            println!(
                "Exported {} record(s) to: {}",
                workspace.records().len(),
                output.display()
            );
        }

        XmlCommands::Import { file, force } => {
            let xml = read_file(&file)?;
            if !force && !workspace.records().is_empty() {
                // Parse anyway so a broken file is reported before asking
                let parsed = parse_xml(&xml)?;
                println!(
                    "This will replace the header and {} record(s) with {} record(s) from {}.",
                    workspace.records().len(),
                    parsed.records.len(),
                    file.display()
                );
                println!("To proceed, run again with --force flag:");
                println!("  commitments xml import {} --force", file.display());
                return Ok(());
            }

            let count = workspace.import_xml(&xml)?;
            println!("Imported {} record(s) from: {}", count, file.display());
        }

        XmlCommands::Verify { file } => {
            let parsed = parse_xml(&read_file(&file)?)?;
            print!("{}", format_xml_summary(&summarize(&parsed)));
        }

        XmlCommands::Compare { file } => {
            let parsed = parse_xml(&read_file(&file)?)?;
            let comparison = compare(&parsed, workspace.header(), workspace.records());
            print!("{}", format_xml_comparison(&comparison));
        }
    }

    Ok(())
}
