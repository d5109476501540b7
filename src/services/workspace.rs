//! Records workspace
//!
//! The per-user session context: header, record list and prefill flag held
//! in memory, a [`CommitmentStore`] they are persisted to, and an
//! [`ActivitySink`] that counts created and modified records. Every mutation
//! changes memory first and then writes through to the store.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{BulkEdit, Header, Record, RecordId, RecordPatch};
use crate::storage::CommitmentStore;
use crate::xml::{generate_xml, parse_xml};

use super::activity::ActivitySink;
use super::sequence::{self, RenumberResult, SequenceIntegrity, SequenceIssue};
use super::validation::{validate_all, ValidationError};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Which records a bulk edit touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkTarget {
    All,
    Ids(Vec<RecordId>),
}

/// One page of a listing (1-based)
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `items` into pages of `page_size`
///
/// There is always at least one page; a page past the end is empty.
pub fn page<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let start = (page - 1).saturating_mul(page_size);

    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Non-finite amounts cannot be stored or exported
fn check_amount(patch: &RecordPatch) -> CommitmentResult<()> {
    match patch.item_amount {
        Some(amount) if !amount.is_finite() => Err(CommitmentError::InvalidInput(format!(
            "Amount must be a finite number, got {}",
            amount
        ))),
        _ => Ok(()),
    }
}

/// Everything the sequence checker reports for the workspace
#[derive(Debug, Clone, Serialize)]
pub struct SequenceReport {
    pub issues: Vec<SequenceIssue>,
    pub integrity: SequenceIntegrity,
    pub order_issues: Vec<String>,
}

impl SequenceReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty() && self.order_issues.is_empty()
    }
}

pub struct Workspace<'a> {
    header: Header,
    records: Vec<Record>,
    prefill_enabled: bool,
    store: Box<dyn CommitmentStore + 'a>,
    activity: Box<dyn ActivitySink + 'a>,
}

impl<'a> Workspace<'a> {
    /// Load header, records and the prefill flag from `store`
    pub fn open(
        store: Box<dyn CommitmentStore + 'a>,
        activity: Box<dyn ActivitySink + 'a>,
    ) -> CommitmentResult<Self> {
        let header = store.load_header()?;
        let records = store.load_records()?;
        let prefill_enabled = store.load_prefill_enabled()?;
        debug!(backend = store.name(), records = records.len(), "workspace opened");

        Ok(Self {
            header,
            records,
            prefill_enabled,
            store,
            activity,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn prefill_enabled(&self) -> bool {
        self.prefill_enabled
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    /// Resolve a user-typed identifier to a record id
    ///
    /// A plain number selects the record with that sequence number when one
    /// exists; otherwise the identifier is matched against record ids.
    pub fn resolve(&self, identifier: &str) -> CommitmentResult<RecordId> {
        let identifier = identifier.trim();
        if let Ok(n) = identifier.parse::<u32>() {
            let numbered: Vec<_> = self
                .records
                .iter()
                .filter(|r| r.sequence_number == Some(n))
                .collect();
            match numbered.as_slice() {
                [record] => return Ok(record.id),
                [] => {}
                _ => {
                    return Err(CommitmentError::InvalidInput(format!(
                        "Sequence number {} is used by {} records; use the record id",
                        n,
                        numbered.len()
                    )))
                }
            }
        }

        let matches: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.id.matches(identifier))
            .collect();
        match matches.as_slice() {
            [record] => Ok(record.id),
            [] => Err(CommitmentError::record_not_found(identifier)),
            _ => Err(CommitmentError::InvalidInput(format!(
                "Identifier '{}' matches {} records",
                identifier,
                matches.len()
            ))),
        }
    }

    pub fn get(&self, id: RecordId) -> CommitmentResult<&Record> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CommitmentError::record_not_found(id.to_string()))
    }

    fn position(&self, id: RecordId) -> CommitmentResult<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CommitmentError::record_not_found(id.to_string()))
    }

    fn persist_records(&self) -> CommitmentResult<()> {
        self.store.save_records(&self.records)
    }

    pub fn set_header(&mut self, header: Header) -> CommitmentResult<()> {
        self.header = header;
        self.store.save_header(&self.header)
    }

    /// Append a record built from `patch`
    ///
    /// With prefill on, fields are first copied from the last record. The
    /// new record gets the next sequence number.
    pub fn add_record(&mut self, patch: &RecordPatch) -> CommitmentResult<Record> {
        let mut record = match self.records.last() {
            Some(previous) if self.prefill_enabled => Record::prefilled_from(previous),
            _ => Record::new(),
        };
        check_amount(patch)?;
        patch.apply(&mut record);
        record.sequence_number = Some(sequence::next_sequence_number(&self.records)?);

        self.records.push(record.clone());
        self.persist_records()?;
        self.activity.log(1, 0, record.item.amount)?;
        info!(id = %record.id, seq = ?record.sequence_number, "record added");
        Ok(record)
    }

    pub fn update_record(&mut self, id: RecordId, patch: &RecordPatch) -> CommitmentResult<Record> {
        check_amount(patch)?;
        let index = self.position(id)?;
        patch.apply(&mut self.records[index]);
        let record = self.records[index].clone();

        self.persist_records()?;
        self.activity.log(0, 1, 0.0)?;
        info!(id = %record.id, "record updated");
        Ok(record)
    }

    pub fn remove_record(&mut self, id: RecordId) -> CommitmentResult<Record> {
        let index = self.position(id)?;
        let record = self.records.remove(index);
        self.persist_records()?;
        info!(id = %record.id, "record removed");
        Ok(record)
    }

    /// Remove every listed record; unknown ids are ignored
    pub fn remove_records(&mut self, ids: &[RecordId]) -> CommitmentResult<usize> {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist_records()?;
        }
        info!(removed, "records removed");
        Ok(removed)
    }

    /// Apply `edit` to the targeted records and return how many changed
    pub fn bulk_edit(&mut self, target: &BulkTarget, edit: &BulkEdit) -> CommitmentResult<usize> {
        if edit.is_empty() {
            return Err(CommitmentError::InvalidInput(
                "Bulk edit sets no fields".into(),
            ));
        }
        if let BulkTarget::Ids(ids) = target {
            for id in ids {
                self.position(*id)?;
            }
        }

        let mut changed = 0;
        for record in self.records.iter_mut() {
            let selected = match target {
                BulkTarget::All => true,
                BulkTarget::Ids(ids) => ids.contains(&record.id),
            };
            if selected {
                edit.apply(record);
                changed += 1;
            }
        }

        self.persist_records()?;
        self.activity.log(0, changed as u64, 0.0)?;
        info!(changed, fields = ?edit.field_names(), "bulk edit applied");
        Ok(changed)
    }

    pub fn search(&self, query: &str) -> Vec<&Record> {
        self.records.iter().filter(|r| r.matches_query(query)).collect()
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        validate_all(&self.header, &self.records)
    }

    /// Serialize to XML; refuses when validation reports any error
    pub fn export_xml(&self) -> CommitmentResult<String> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(CommitmentError::Validation(errors));
        }
        Ok(generate_xml(&self.header, &self.records))
    }

    /// Replace header and records with the contents of `xml`
    ///
    /// Nothing changes when parsing fails.
    pub fn import_xml(&mut self, xml: &str) -> CommitmentResult<usize> {
        let parsed = parse_xml(xml)?;
        let count = parsed.records.len();
        let amount: f64 = parsed.records.iter().map(|r| r.item.amount).sum();

        self.header = parsed.header;
        self.records = parsed.records;
        self.store.save_header(&self.header)?;
        self.persist_records()?;
        self.activity.log(count as u64, 0, amount)?;
        info!(count, "records imported");
        Ok(count)
    }

    pub fn check_sequences(&self) -> SequenceReport {
        SequenceReport {
            issues: sequence::detect(&self.records),
            integrity: sequence::integrity(&self.records),
            order_issues: sequence::validate_order(&self.records),
        }
    }

    pub fn renumber(&mut self) -> CommitmentResult<RenumberResult> {
        let result = sequence::renumber(&mut self.records);
        self.persist_records()?;
        if result.records_renumbered > 0 {
            self.activity.log(0, result.records_renumbered as u64, 0.0)?;
        }
        info!(renumbered = result.records_renumbered, "records renumbered");
        Ok(result)
    }

    /// Drop header and records; the header returns to its defaults
    pub fn clear_all(&mut self) -> CommitmentResult<()> {
        self.header = Header::default();
        self.records.clear();
        self.store.clear_all()?;
        info!("workspace cleared");
        Ok(())
    }

    pub fn set_prefill(&mut self, enabled: bool) -> CommitmentResult<()> {
        self.prefill_enabled = enabled;
        self.store.save_prefill_enabled(enabled)
    }
}
