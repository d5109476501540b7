//! JSON-file commitment store
//!
//! Keeps one directory per user holding `header.json`, `records.json` and
//! `prefill.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::file_io::{read_json_or, remove_if_exists, write_json_atomic};
use super::CommitmentStore;
use crate::error::CommitmentResult;
use crate::models::{Header, Record};

const HEADER_FILE: &str = "header.json";
const RECORDS_FILE: &str = "records.json";
const PREFILL_FILE: &str = "prefill.json";

/// On-disk shape of `records.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordData {
    records: Vec<Record>,
}

/// On-disk shape of `prefill.json`
#[derive(Debug, Serialize, Deserialize)]
struct PrefillData {
    enabled: bool,
}

pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl CommitmentStore for JsonStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn load_header(&self) -> CommitmentResult<Header> {
        read_json_or(self.file(HEADER_FILE), Header::default)
    }

    fn save_header(&self, header: &Header) -> CommitmentResult<()> {
        write_json_atomic(self.file(HEADER_FILE), header)
    }

    fn load_records(&self) -> CommitmentResult<Vec<Record>> {
        let data: RecordData = read_json_or(self.file(RECORDS_FILE), RecordData::default)?;
        debug!(count = data.records.len(), dir = %self.dir.display(), "loaded records");
        Ok(data.records)
    }

    fn save_records(&self, records: &[Record]) -> CommitmentResult<()> {
        let data = RecordData {
            records: records.to_vec(),
        };
        write_json_atomic(self.file(RECORDS_FILE), &data)
    }

    fn clear_all(&self) -> CommitmentResult<()> {
        remove_if_exists(self.file(HEADER_FILE))?;
        remove_if_exists(self.file(RECORDS_FILE))
    }

    fn load_prefill_enabled(&self) -> CommitmentResult<bool> {
        let data = read_json_or(self.file(PREFILL_FILE), || PrefillData { enabled: true })?;
        Ok(data.enabled)
    }

    fn save_prefill_enabled(&self, enabled: bool) -> CommitmentResult<()> {
        write_json_atomic(self.file(PREFILL_FILE), &PrefillData { enabled })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("user"));
        (temp_dir, store)
    }

    #[test]
    fn test_defaults_when_empty() {
        let (_temp_dir, store) = store();
        assert_eq!(store.load_header().unwrap(), Header::default());
        assert!(store.load_records().unwrap().is_empty());
        assert!(store.load_prefill_enabled().unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, store) = store();

        let mut header = Header::defaults_for_year(2025);
        header.treasury = "Belgrade".into();
        store.save_header(&header).unwrap();

        let mut record = Record::new();
        record.sequence_number = Some(1);
        record.recipient = "Acme".into();
        record.item.amount = 42.5;
        store.save_records(&[record.clone()]).unwrap();

        store.save_prefill_enabled(false).unwrap();

        assert_eq!(store.load_header().unwrap(), header);
        assert_eq!(store.load_records().unwrap(), vec![record]);
        assert!(!store.load_prefill_enabled().unwrap());
    }

    #[test]
    fn test_clear_all_keeps_prefill() {
        let (_temp_dir, store) = store();
        store.save_header(&Header::empty()).unwrap();
        store.save_records(&[Record::new()]).unwrap();
        store.save_prefill_enabled(false).unwrap();

        store.clear_all().unwrap();

        assert_eq!(store.load_header().unwrap(), Header::default());
        assert!(store.load_records().unwrap().is_empty());
        assert!(!store.load_prefill_enabled().unwrap());
    }

    #[test]
    fn test_corrupt_records_file_yields_empty_list() {
        let (_temp_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join(RECORDS_FILE), "[[[").unwrap();

        assert!(store.load_records().unwrap().is_empty());
    }
}
