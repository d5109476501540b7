//! Export module for commitments-cli
//!
//! Secondary export formats next to the XML wire format:
//! - CSV: the record list, spreadsheet-compatible
//! - JSON / YAML: a full workspace snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_records_csv;
pub use self::json::{export_snapshot_json, snapshot_from_json, Snapshot, SNAPSHOT_SCHEMA_VERSION};
pub use self::yaml::{export_snapshot_yaml, snapshot_from_yaml};
