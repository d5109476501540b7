//! SQLite commitment store
//!
//! All users share one database file. Rows are scoped by `user_id`, and each
//! record's budget item lives in `record_items`.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::CommitmentStore;
use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{Header, Record, RecordId, RecordItem, UserId};

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS headers (
        id                      INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id                 TEXT NOT NULL UNIQUE,
        cumulative_reason_code  TEXT NOT NULL DEFAULT '',
        budget_year             TEXT NOT NULL DEFAULT '',
        budget_user_id          TEXT NOT NULL DEFAULT '',
        currency_code           TEXT NOT NULL DEFAULT '',
        treasury                TEXT NOT NULL DEFAULT '',
        updated_at              TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS records (
        id                       TEXT PRIMARY KEY,
        user_id                  TEXT NOT NULL,
        header_id                INTEGER REFERENCES headers(id) ON DELETE SET NULL,
        sequence_number          INTEGER,
        reason_code              TEXT NOT NULL DEFAULT '',
        external_id              TEXT NOT NULL DEFAULT '',
        recipient                TEXT NOT NULL DEFAULT '',
        recipient_place          TEXT NOT NULL DEFAULT '',
        account_number           TEXT NOT NULL DEFAULT '',
        invoice_number           TEXT NOT NULL DEFAULT '',
        invoice_type             TEXT NOT NULL DEFAULT '',
        invoice_date             TEXT NOT NULL DEFAULT '',
        due_date                 TEXT NOT NULL DEFAULT '',
        contract_number          TEXT NOT NULL DEFAULT '',
        payment_code             TEXT NOT NULL DEFAULT '',
        credit_model             TEXT NOT NULL DEFAULT '',
        credit_reference_number  TEXT NOT NULL DEFAULT '',
        payment_basis            TEXT NOT NULL DEFAULT '',
        created_at               TEXT NOT NULL,
        updated_at               TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_records_user ON records(user_id);

    CREATE TABLE IF NOT EXISTS record_items (
        record_id                     TEXT PRIMARY KEY REFERENCES records(id) ON DELETE CASCADE,
        budget_user_id                TEXT NOT NULL DEFAULT '',
        program_code                  TEXT NOT NULL DEFAULT '',
        project_code                  TEXT NOT NULL DEFAULT '',
        economic_classification_code  TEXT NOT NULL DEFAULT '',
        source_of_funding_code        TEXT NOT NULL DEFAULT '',
        function_code                 TEXT NOT NULL DEFAULT '',
        amount                        REAL NOT NULL DEFAULT 0,
        recording_account             TEXT NOT NULL DEFAULT '',
        expected_payment_date         TEXT NOT NULL DEFAULT '',
        urgent_payment                INTEGER NOT NULL DEFAULT 0,
        posting_account               TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS preferences (
        user_id          TEXT PRIMARY KEY,
        prefill_enabled  INTEGER NOT NULL DEFAULT 1
    );
"#;

const SELECT_RECORDS: &str = r#"
    SELECT r.id, r.sequence_number, r.reason_code, r.external_id, r.recipient,
           r.recipient_place, r.account_number, r.invoice_number, r.invoice_type,
           r.invoice_date, r.due_date, r.contract_number, r.payment_code,
           r.credit_model, r.credit_reference_number, r.payment_basis, r.created_at,
           i.budget_user_id AS item_budget_user_id,
           i.program_code AS item_program_code,
           i.project_code AS item_project_code,
           i.economic_classification_code AS item_economic_classification_code,
           i.source_of_funding_code AS item_source_of_funding_code,
           i.function_code AS item_function_code,
           i.amount AS item_amount,
           i.recording_account AS item_recording_account,
           i.expected_payment_date AS item_expected_payment_date,
           i.urgent_payment AS item_urgent_payment,
           i.posting_account AS item_posting_account
    FROM records r
    LEFT JOIN record_items i ON i.record_id = r.id
    WHERE r.user_id = ?1
    ORDER BY r.sequence_number IS NULL, r.sequence_number, r.created_at
"#;

/// Fixed-width UTC timestamps so text ordering matches time ordering
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// A `records` row before id and timestamp parsing
struct RecordRow {
    id: String,
    created_at: String,
    record: Record,
}

fn item_text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<RecordRow> {
    let item = RecordItem {
        budget_user_id: item_text(row, "item_budget_user_id")?,
        program_code: item_text(row, "item_program_code")?,
        project_code: item_text(row, "item_project_code")?,
        economic_classification_code: item_text(row, "item_economic_classification_code")?,
        source_of_funding_code: item_text(row, "item_source_of_funding_code")?,
        function_code: item_text(row, "item_function_code")?,
        amount: row.get::<_, Option<f64>>("item_amount")?.unwrap_or(0.0),
        recording_account: item_text(row, "item_recording_account")?,
        expected_payment_date: item_text(row, "item_expected_payment_date")?,
        urgent_payment: row.get::<_, Option<bool>>("item_urgent_payment")?.unwrap_or(false),
        posting_account: item_text(row, "item_posting_account")?,
    };

    let mut record = Record::new();
    record.sequence_number = row.get("sequence_number")?;
    record.reason_code = row.get("reason_code")?;
    record.external_id = row.get("external_id")?;
    record.recipient = row.get("recipient")?;
    record.recipient_place = row.get("recipient_place")?;
    record.account_number = row.get("account_number")?;
    record.invoice_number = row.get("invoice_number")?;
    record.invoice_type = row.get("invoice_type")?;
    record.invoice_date = row.get("invoice_date")?;
    record.due_date = row.get("due_date")?;
    record.contract_number = row.get("contract_number")?;
    record.payment_code = row.get("payment_code")?;
    record.credit_model = row.get("credit_model")?;
    record.credit_reference_number = row.get("credit_reference_number")?;
    record.payment_basis = row.get("payment_basis")?;
    record.item = item;

    Ok(RecordRow {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        record,
    })
}

impl RecordRow {
    fn into_record(self) -> CommitmentResult<Record> {
        let uuid = Uuid::parse_str(&self.id)
            .map_err(|e| CommitmentError::Database(format!("bad record id {}: {}", self.id, e)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| {
                CommitmentError::Database(format!("bad created_at for {}: {}", self.id, e))
            })?
            .with_timezone(&Utc);

        let mut record = self.record;
        record.id = RecordId::from(uuid);
        record.created_at = created_at;
        Ok(record)
    }
}

pub struct SqliteStore {
    conn: Connection,
    user_key: String,
}

impl SqliteStore {
    /// Open (and create if needed) the database at `path` for one user
    pub fn open(path: &Path, user_id: UserId) -> CommitmentResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn, user_id)
    }

    pub fn open_in_memory(user_id: UserId) -> CommitmentResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, user_id)
    }

    fn with_connection(conn: Connection, user_id: UserId) -> CommitmentResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            user_key: user_id.as_uuid().to_string(),
        })
    }
}

impl CommitmentStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load_header(&self) -> CommitmentResult<Header> {
        let header = self
            .conn
            .query_row(
                "SELECT cumulative_reason_code, budget_year, budget_user_id, currency_code, treasury
                 FROM headers WHERE user_id = ?1",
                params![self.user_key],
                |row| {
                    Ok(Header {
                        cumulative_reason_code: row.get(0)?,
                        budget_year: row.get(1)?,
                        budget_user_id: row.get(2)?,
                        currency_code: row.get(3)?,
                        treasury: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(header.unwrap_or_default())
    }

    fn save_header(&self, header: &Header) -> CommitmentResult<()> {
        self.conn.execute(
            "INSERT INTO headers (user_id, cumulative_reason_code, budget_year, budget_user_id,
                                  currency_code, treasury, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id) DO UPDATE SET
                 cumulative_reason_code = excluded.cumulative_reason_code,
                 budget_year = excluded.budget_year,
                 budget_user_id = excluded.budget_user_id,
                 currency_code = excluded.currency_code,
                 treasury = excluded.treasury,
                 updated_at = excluded.updated_at",
            params![
                self.user_key,
                header.cumulative_reason_code,
                header.budget_year,
                header.budget_user_id,
                header.currency_code,
                header.treasury,
                timestamp(Utc::now()),
            ],
        )?;
        Ok(())
    }

    fn load_records(&self) -> CommitmentResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(SELECT_RECORDS)?;
        let rows = stmt.query_map(params![self.user_key], map_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        debug!(count = records.len(), "loaded records from sqlite");
        Ok(records)
    }

    fn save_records(&self, records: &[Record]) -> CommitmentResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let now = timestamp(Utc::now());

        tx.execute(
            "DELETE FROM record_items WHERE record_id IN (SELECT id FROM records WHERE user_id = ?1)",
            params![self.user_key],
        )?;
        tx.execute("DELETE FROM records WHERE user_id = ?1", params![self.user_key])?;

        {
            let mut insert_record = tx.prepare(
                "INSERT INTO records (id, user_id, header_id, sequence_number, reason_code,
                     external_id, recipient, recipient_place, account_number, invoice_number,
                     invoice_type, invoice_date, due_date, contract_number, payment_code,
                     credit_model, credit_reference_number, payment_basis, created_at, updated_at)
                 VALUES (?1, ?2, (SELECT id FROM headers WHERE user_id = ?2), ?3, ?4, ?5, ?6, ?7,
                         ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            )?;
            let mut insert_item = tx.prepare(
                "INSERT INTO record_items (record_id, budget_user_id, program_code, project_code,
                     economic_classification_code, source_of_funding_code, function_code, amount,
                     recording_account, expected_payment_date, urgent_payment, posting_account)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for record in records {
                let record_key = record.id.as_uuid().to_string();
                insert_record.execute(params![
                    record_key,
                    self.user_key,
                    record.sequence_number,
                    record.reason_code,
                    record.external_id,
                    record.recipient,
                    record.recipient_place,
                    record.account_number,
                    record.invoice_number,
                    record.invoice_type,
                    record.invoice_date,
                    record.due_date,
                    record.contract_number,
                    record.payment_code,
                    record.credit_model,
                    record.credit_reference_number,
                    record.payment_basis,
                    timestamp(record.created_at),
                    now,
                ])?;

                let item = &record.item;
                insert_item.execute(params![
                    record_key,
                    item.budget_user_id,
                    item.program_code,
                    item.project_code,
                    item.economic_classification_code,
                    item.source_of_funding_code,
                    item.function_code,
                    item.amount,
                    item.recording_account,
                    item.expected_payment_date,
                    item.urgent_payment,
                    item.posting_account,
                ])?;
            }
        }

        tx.commit()?;
        debug!(count = records.len(), "saved records to sqlite");
        Ok(())
    }

    fn clear_all(&self) -> CommitmentResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM record_items WHERE record_id IN (SELECT id FROM records WHERE user_id = ?1)",
            params![self.user_key],
        )?;
        tx.execute("DELETE FROM records WHERE user_id = ?1", params![self.user_key])?;
        tx.execute("DELETE FROM headers WHERE user_id = ?1", params![self.user_key])?;
        tx.commit()?;
        Ok(())
    }

    fn load_prefill_enabled(&self) -> CommitmentResult<bool> {
        let enabled: Option<bool> = self
            .conn
            .query_row(
                "SELECT prefill_enabled FROM preferences WHERE user_id = ?1",
                params![self.user_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(enabled.unwrap_or(true))
    }

    fn save_prefill_enabled(&self, enabled: bool) -> CommitmentResult<()> {
        self.conn.execute(
            "INSERT INTO preferences (user_id, prefill_enabled) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET prefill_enabled = excluded.prefill_enabled",
            params![self.user_key, enabled],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn record(seq: Option<u32>, recipient: &str) -> Record {
        let mut record = Record::new();
        record.sequence_number = seq;
        record.recipient = recipient.into();
        record.item.amount = 10.0;
        record.item.program_code = "0701".into();
        record
    }

    #[test]
    fn test_header_upsert() {
        let store = SqliteStore::open_in_memory(UserId::new()).unwrap();
        assert_eq!(store.load_header().unwrap(), Header::default());

        let mut header = Header::defaults_for_year(2025);
        store.save_header(&header).unwrap();
        header.treasury = "Nis".into();
        store.save_header(&header).unwrap();

        assert_eq!(store.load_header().unwrap(), header);
    }

    #[test]
    fn test_records_round_trip_in_sequence_order() {
        let store = SqliteStore::open_in_memory(UserId::new()).unwrap();
        let mut unnumbered = record(None, "c");
        unnumbered.item.urgent_payment = true;
        let records = vec![unnumbered, record(Some(2), "b"), record(Some(1), "a")];

        store.save_records(&records).unwrap();
        let loaded = store.load_records().unwrap();

        let recipients: Vec<_> = loaded.iter().map(|r| r.recipient.as_str()).collect();
        assert_eq!(recipients, vec!["a", "b", "c"]);
        assert_eq!(loaded[2], records[0]);
        assert!(loaded[2].item.urgent_payment);
    }

    #[test]
    fn test_created_at_breaks_ties() {
        let store = SqliteStore::open_in_memory(UserId::new()).unwrap();
        let mut newer = record(Some(1), "newer");
        let mut older = record(Some(1), "older");
        older.created_at = newer.created_at - Duration::minutes(5);
        newer.created_at += Duration::seconds(1);

        store.save_records(&[newer, older]).unwrap();
        let loaded = store.load_records().unwrap();
        assert_eq!(loaded[0].recipient, "older");
    }

    #[test]
    fn test_save_replaces_and_users_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("commitments.db");
        let ana = SqliteStore::open(&path, UserId::new()).unwrap();
        let marko = SqliteStore::open(&path, UserId::new()).unwrap();

        ana.save_records(&[record(Some(1), "x"), record(Some(2), "y")]).unwrap();
        marko.save_records(&[record(Some(1), "z")]).unwrap();
        ana.save_records(&[record(Some(1), "only")]).unwrap();

        assert_eq!(ana.load_records().unwrap().len(), 1);
        assert_eq!(marko.load_records().unwrap()[0].recipient, "z");
    }

    #[test]
    fn test_record_without_item_row_loads_empty_item() {
        let store = SqliteStore::open_in_memory(UserId::new()).unwrap();
        let saved = record(Some(1), "a");
        store.save_records(&[saved.clone()]).unwrap();
        store
            .conn
            .execute("DELETE FROM record_items", [])
            .unwrap();

        let loaded = store.load_records().unwrap();
        assert_eq!(loaded[0].item, RecordItem::default());
        assert_eq!(loaded[0].id, saved.id);
    }

    #[test]
    fn test_clear_all_and_prefill() {
        let store = SqliteStore::open_in_memory(UserId::new()).unwrap();
        store.save_header(&Header::empty()).unwrap();
        store.save_records(&[record(Some(1), "a")]).unwrap();
        assert!(store.load_prefill_enabled().unwrap());
        store.save_prefill_enabled(false).unwrap();

        store.clear_all().unwrap();

        assert!(store.load_records().unwrap().is_empty());
        assert_eq!(store.load_header().unwrap(), Header::default());
        assert!(!store.load_prefill_enabled().unwrap());
    }
}
