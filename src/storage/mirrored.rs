//! Store that writes through to a second backend
//!
//! Reads come from the primary. Every write goes to the primary first and
//! then to the mirror; a mirror failure is returned to the caller.

use tracing::debug;

use super::CommitmentStore;
use crate::error::CommitmentResult;
use crate::models::{Header, Record};

pub struct MirroredStore {
    primary: Box<dyn CommitmentStore>,
    mirror: Box<dyn CommitmentStore>,
}

impl MirroredStore {
    pub fn new(primary: Box<dyn CommitmentStore>, mirror: Box<dyn CommitmentStore>) -> Self {
        Self { primary, mirror }
    }

    fn both(&self, op: &str, f: impl Fn(&dyn CommitmentStore) -> CommitmentResult<()>) -> CommitmentResult<()> {
        f(self.primary.as_ref())?;
        f(self.mirror.as_ref())?;
        debug!(op, primary = self.primary.name(), mirror = self.mirror.name(), "mirrored write");
        Ok(())
    }
}

impl CommitmentStore for MirroredStore {
    fn name(&self) -> &'static str {
        "mirrored"
    }

    fn load_header(&self) -> CommitmentResult<Header> {
        self.primary.load_header()
    }

    fn save_header(&self, header: &Header) -> CommitmentResult<()> {
        self.both("save_header", |store| store.save_header(header))
    }

    fn load_records(&self) -> CommitmentResult<Vec<Record>> {
        self.primary.load_records()
    }

    fn save_records(&self, records: &[Record]) -> CommitmentResult<()> {
        self.both("save_records", |store| store.save_records(records))
    }

    fn clear_all(&self) -> CommitmentResult<()> {
        self.both("clear_all", |store| store.clear_all())
    }

    fn load_prefill_enabled(&self) -> CommitmentResult<bool> {
        self.primary.load_prefill_enabled()
    }

    fn save_prefill_enabled(&self, enabled: bool) -> CommitmentResult<()> {
        self.both("save_prefill_enabled", |store| {
            store.save_prefill_enabled(enabled)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use crate::storage::{JsonStore, SqliteStore};
    use tempfile::TempDir;

    #[test]
    fn test_writes_reach_both_stores() {
        let temp_dir = TempDir::new().unwrap();
        let user_id = UserId::new();
        let db = temp_dir.path().join("commitments.db");
        let dir = temp_dir.path().join("user");

        let store = MirroredStore::new(
            Box::new(JsonStore::new(dir.clone())),
            Box::new(SqliteStore::open(&db, user_id).unwrap()),
        );

        let mut record = Record::new();
        record.sequence_number = Some(1);
        record.recipient = "Acme".into();
        store.save_records(&[record.clone()]).unwrap();
        store.save_prefill_enabled(false).unwrap();

        let mirror = SqliteStore::open(&db, user_id).unwrap();
        assert_eq!(mirror.load_records().unwrap(), vec![record.clone()]);
        assert!(!mirror.load_prefill_enabled().unwrap());
        assert_eq!(store.load_records().unwrap(), vec![record]);

        store.clear_all().unwrap();
        assert!(mirror.load_records().unwrap().is_empty());
        assert!(JsonStore::new(dir).load_records().unwrap().is_empty());
    }
}
