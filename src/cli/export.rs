//! CLI commands for data export
//!
//! Secondary formats next to the XML wire format: the record list as CSV and
//! a full workspace snapshot as JSON or YAML.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::open_workspace;
use crate::config::Settings;
use crate::error::{CommitmentError, CommitmentResult};
use crate::export::{export_records_csv, export_snapshot_json, export_snapshot_yaml, Snapshot};
use crate::services::auth::AuthService;
use crate::storage::Storage;

/// Snapshot format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the record list to CSV
    Records {
        /// Output file path
        output: PathBuf,
    },
    /// Export header, records and totals
    Snapshot {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: SnapshotFormat,
    },
}

fn create_writer(output: &PathBuf) -> CommitmentResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        CommitmentError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> CommitmentResult<()> {
    let workspace = open_workspace(storage, settings)?;

    match cmd {
        ExportCommands::Records { output } => {
            let mut writer = create_writer(&output)?;
            export_records_csv(workspace.header(), workspace.records(), &mut writer)?;
            writer
                .flush()
                .map_err(|e| CommitmentError::Export(e.to_string()))?;
            println!(
                "{} record(s) exported to: {}",
                workspace.records().len(),
                output.display()
            );
        }

        ExportCommands::Snapshot { output, format } => {
            let user = AuthService::new(storage).require_user()?;
            let snapshot = Snapshot::new(
                user.username,
                workspace.backend_name(),
                workspace.header(),
                workspace.records(),
            );

            let mut writer = create_writer(&output)?;
            match format {
                SnapshotFormat::Json => export_snapshot_json(&snapshot, &mut writer)?,
                SnapshotFormat::Yaml => export_snapshot_yaml(&snapshot, &mut writer)?,
            }
            writer
                .flush()
                .map_err(|e| CommitmentError::Export(e.to_string()))?;
            println!("Snapshot exported to: {}", output.display());
        }
    }

    Ok(())
}
