//! JSON snapshot export
//!
//! A snapshot is the full state of one workspace (header, records and a few
//! totals) with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{Header, Record};

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub username: String,
    pub backend: String,
    pub header: Header,
    pub records: Vec<Record>,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub record_count: usize,
    pub urgent_count: usize,
    pub total_amount: f64,
    pub lowest_sequence: Option<u32>,
    pub highest_sequence: Option<u32>,
}

impl SnapshotMetadata {
    fn compute(records: &[Record]) -> Self {
        let numbers = records.iter().filter_map(|r| r.sequence_number);
        Self {
            record_count: records.len(),
            urgent_count: records.iter().filter(|r| r.item.urgent_payment).count(),
            total_amount: records.iter().map(|r| r.item.amount).sum(),
            lowest_sequence: numbers.clone().min(),
            highest_sequence: numbers.max(),
        }
    }
}

impl Snapshot {
    pub fn new(
        username: impl Into<String>,
        backend: impl Into<String>,
        header: &Header,
        records: &[Record],
    ) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            username: username.into(),
            backend: backend.into(),
            header: header.clone(),
            records: records.to_vec(),
            metadata: SnapshotMetadata::compute(records),
        }
    }

    /// Check that the metadata agrees with the records
    pub fn validate(&self) -> Result<(), String> {
        if self.metadata.record_count != self.records.len() {
            return Err(format!(
                "Record count mismatch: metadata says {}, found {}",
                self.metadata.record_count,
                self.records.len()
            ));
        }
        Ok(())
    }
}

pub fn export_snapshot_json<W: Write>(snapshot: &Snapshot, writer: W) -> CommitmentResult<()> {
    serde_json::to_writer_pretty(writer, snapshot)
        .map_err(|e| CommitmentError::Export(e.to_string()))
}

pub fn snapshot_from_json(json: &str) -> CommitmentResult<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.validate().map_err(CommitmentError::InvalidInput)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        let mut a = Record::new();
        a.sequence_number = Some(2);
        a.item.amount = 10.0;
        a.item.urgent_payment = true;
        let mut b = Record::new();
        b.sequence_number = Some(5);
        b.item.amount = 2.5;
        vec![a, b, Record::new()]
    }

    #[test]
    fn test_metadata() {
        let snapshot = Snapshot::new("ana", "local", &Header::empty(), &records());
        assert_eq!(
            snapshot.metadata,
            SnapshotMetadata {
                record_count: 3,
                urgent_count: 1,
                total_amount: 12.5,
                lowest_sequence: Some(2),
                highest_sequence: Some(5),
            }
        );
    }

    #[test]
    fn test_json_round_trip_and_validation() {
        let snapshot = Snapshot::new("ana", "sqlite", &Header::default(), &records());
        let mut output = Vec::new();
        export_snapshot_json(&snapshot, &mut output).unwrap();
        let json = String::from_utf8(output).unwrap();

        let back = snapshot_from_json(&json).unwrap();
        assert_eq!(back.records, snapshot.records);
        assert_eq!(back.schema_version, SNAPSHOT_SCHEMA_VERSION);

        let tampered = json.replace("\"record_count\": 3", "\"record_count\": 4");
        assert!(snapshot_from_json(&tampered).is_err());
    }
}
