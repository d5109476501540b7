//! YAML snapshot export

use std::io::Write;

use crate::error::{CommitmentError, CommitmentResult};
use crate::export::json::Snapshot;

fn export_error(err: impl std::fmt::Display) -> CommitmentError {
    CommitmentError::Export(err.to_string())
}

/// Write `snapshot` as YAML preceded by a comment banner
pub fn export_snapshot_yaml<W: Write>(snapshot: &Snapshot, mut writer: W) -> CommitmentResult<()> {
    writeln!(writer, "# commitments-cli snapshot").map_err(export_error)?;
    writeln!(writer, "# User: {}", snapshot.username).map_err(export_error)?;
    writeln!(writer, "# Generated: {}", snapshot.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", snapshot.app_version).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(writer, snapshot).map_err(export_error)
}

pub fn snapshot_from_yaml(yaml: &str) -> CommitmentResult<Snapshot> {
    let snapshot: Snapshot =
        serde_yaml::from_str(yaml).map_err(|e| CommitmentError::InvalidInput(e.to_string()))?;
    snapshot.validate().map_err(CommitmentError::InvalidInput)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Header, Record};

    #[test]
    fn test_yaml_export_round_trip() {
        let mut record = Record::new();
        record.recipient = "Acme: \"quoted\"".into();
        record.sequence_number = Some(1);
        let snapshot = Snapshot::new("ana", "local", &Header::default(), &[record]);

        let mut output = Vec::new();
        export_snapshot_yaml(&snapshot, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# commitments-cli snapshot\n# User: ana"));
        let back = snapshot_from_yaml(&yaml).unwrap();
        assert_eq!(back.records, snapshot.records);
        assert_eq!(back.header, snapshot.header);
    }
}
