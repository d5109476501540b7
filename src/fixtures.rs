//! Synthetic fixture files for exercising the XML codec
//!
//! `generate_fixtures` writes a series of `TEST_00N_*.xml` files that walk a
//! record set through typical edits (urgent toggles, a bulk edit, deletes,
//! additions). `validate_fixtures` re-reads every `TEST_*.xml` file in a
//! directory and writes `TEST_VALIDATION_RESULTS.json`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{BulkEdit, Header, Record};
use crate::services::sequence;
use crate::xml::{generate_xml, parse_xml};

pub const RESULTS_FILE: &str = "TEST_RESULTS.txt";
pub const VALIDATION_RESULTS_FILE: &str = "TEST_VALIDATION_RESULTS.json";

const INVOICE_TYPES: &[&str] = &["Invoice", "Urgent invoice", "Correction", "Pro forma"];
const PAYMENT_BASES: &[&str] = &[
    "Completed works",
    "Services rendered",
    "Repairs",
    "Consulting services",
    "Material procurement",
];

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureFile {
    pub name: String,
    pub records: usize,
    pub note: String,
}

fn fixture_header() -> Header {
    Header {
        cumulative_reason_code: "PO07".into(),
        budget_year: "2024".into(),
        budget_user_id: "10520".into(),
        currency_code: "RSD".into(),
        treasury: "Test Treasury".into(),
    }
}

/// `count` valid records numbered from `start`
///
/// Records in the middle third of a 1..=`urgent_span * 3` run are urgent.
fn generate_records(rng: &mut impl Rng, count: usize, start: usize, urgent_span: usize) -> Vec<Record> {
    let base = Utc::now();
    (0..count)
        .map(|offset| {
            let n = start + offset;
            let mut record = Record::new();
            record.sequence_number = u32::try_from(n).ok();
            record.created_at = base + Duration::seconds(n as i64);
            record.reason_code = "PO07".into();
            record.recipient = format!("Supplier {:03}", n % 97);
            record.recipient_place = "Belgrade".into();
            record.account_number = format!("160-{:010}-{:02}", n, n % 100);
            record.invoice_number = format!("INV-{:04}", n);
            record.invoice_type = INVOICE_TYPES.choose(rng).copied().unwrap_or_default().into();
            record.invoice_date = "2024-12-01".into();
            record.due_date = "2024-12-31".into();
            record.contract_number = format!("CON-{:04}", n);
            record.payment_basis = PAYMENT_BASES.choose(rng).copied().unwrap_or_default().into();

            let item = &mut record.item;
            item.budget_user_id = "10520".into();
            item.program_code = "0701".into();
            item.economic_classification_code = "423".into();
            item.source_of_funding_code = "01".into();
            item.function_code = "130".into();
            item.amount = rng.gen_range(1_000..201_000) as f64;
            item.recording_account = "4231".into();
            item.expected_payment_date = "2024-12-25".into();
            item.urgent_payment = n > urgent_span && n <= urgent_span * 2;
            record
        })
        .collect()
}

fn bulk_apply(records: &[Record], edit: &BulkEdit) -> Vec<Record> {
    let mut next = records.to_vec();
    next.iter_mut().for_each(|r| edit.apply(r));
    next
}

/// The fixture series, in file order
fn scenarios(rng: &mut impl Rng, count: usize) -> Vec<(&'static str, String, Vec<Record>)> {
    let urgent_span = (count / 3).max(1);
    let initial = generate_records(rng, count, 1, urgent_span);
    let all_urgent = bulk_apply(&initial, &BulkEdit::urgent(true));
    let urgent_reset = bulk_apply(&all_urgent, &BulkEdit::urgent(false));
    let bulk_changed = bulk_apply(
        &urgent_reset,
        &BulkEdit::new(
            Some("INV-TEST-2024".into()),
            None,
            None,
            None,
            None,
            None,
            Some("Test Payment Basis".into()),
            None,
        ),
    );

    let mut deleted: HashSet<u32> = [1, 5, 10].into_iter().collect();
    deleted.extend(40..=50);
    let mut after_delete: Vec<Record> = bulk_changed
        .iter()
        .filter(|r| !r.sequence_number.is_some_and(|n| deleted.contains(&n)))
        .cloned()
        .collect();
    sequence::renumber(&mut after_delete);

    let mut after_add = after_delete.clone();
    after_add.extend(generate_records(rng, 50, after_delete.len() + 1, urgent_span));
    sequence::renumber(&mut after_add);

    vec![
        ("TEST_001_initial.xml", format!("{} records", initial.len()), initial),
        ("TEST_002_all_urgent.xml", format!("{} records (all urgent)", all_urgent.len()), all_urgent),
        ("TEST_003_urgent_reset.xml", format!("{} records (none urgent)", urgent_reset.len()), urgent_reset),
        ("TEST_004_bulk_changed.xml", format!("{} records (invoice changed)", bulk_changed.len()), bulk_changed),
        ("TEST_005_after_delete.xml", format!("{} records", after_delete.len()), after_delete),
        ("TEST_006_after_add.xml", format!("{} records", after_add.len()), after_add),
    ]
}

/// Write the fixture series and `TEST_RESULTS.txt` into `dir`
pub fn generate_fixtures(dir: &Path, count: usize) -> CommitmentResult<Vec<FixtureFile>> {
    if count == 0 {
        return Err(CommitmentError::InvalidInput(
            "Fixture record count must be positive".into(),
        ));
    }
    fs::create_dir_all(dir)?;

    let header = fixture_header();
    let mut rng = rand::thread_rng();
    let mut files = Vec::new();
    for (name, note, records) in scenarios(&mut rng, count) {
        fs::write(dir.join(name), generate_xml(&header, &records))?;
        info!(file = name, records = records.len(), "fixture written");
        files.push(FixtureFile {
            name: name.to_string(),
            records: records.len(),
            note,
        });
    }

    let summary: Vec<String> = files
        .iter()
        .map(|f| format!("{} -> {}", f.name, f.note))
        .collect();
    fs::write(dir.join(RESULTS_FILE), summary.join("\n"))?;
    Ok(files)
}

/// Checks for one fixture file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureReport {
    pub file: String,
    pub total: usize,
    pub urgent: usize,
    /// Blank invoice number, contract number or amount, counted per field
    pub missing_fields: usize,
    /// External ids seen more than once (extra occurrences)
    pub duplicates: usize,
    pub invalid_amounts: usize,
    /// Invoice dates present but not `YYYY-MM-DD`
    pub invalid_dates: usize,
    pub sequence_gaps: bool,
}

pub fn validate_fixture(file: &str, xml: &str) -> CommitmentResult<FixtureReport> {
    let parsed = parse_xml(xml)?;
    let records = &parsed.records;

    let mut report = FixtureReport {
        file: file.to_string(),
        total: records.len(),
        urgent: records.iter().filter(|r| r.item.urgent_payment).count(),
        missing_fields: 0,
        duplicates: 0,
        invalid_amounts: 0,
        invalid_dates: 0,
        sequence_gaps: sequence::has_gaps(records),
    };

    let mut seen = HashSet::new();
    for record in records {
        let amount_ok = record.item.amount.is_finite() && record.item.amount > 0.0;
        report.missing_fields += [
            record.invoice_number.trim().is_empty(),
            record.contract_number.trim().is_empty(),
            record.item.amount == 0.0,
        ]
        .iter()
        .filter(|missing| **missing)
        .count();
        if !amount_ok {
            report.invalid_amounts += 1;
        }
        let date = record.invoice_date.trim();
        if !date.is_empty() && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            report.invalid_dates += 1;
        }
        if !record.external_id.is_empty() && !seen.insert(record.external_id.clone()) {
            report.duplicates += 1;
        }
    }

    Ok(report)
}

/// Validate every `TEST_*.xml` in `dir` and write the JSON report
pub fn validate_fixtures(dir: &Path) -> CommitmentResult<Vec<FixtureReport>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("TEST_") && name.ends_with(".xml"))
        .collect();
    names.sort();

    if names.is_empty() {
        return Err(CommitmentError::NotFound {
            entity_type: "Fixture",
            identifier: format!("TEST_*.xml in {}", dir.display()),
        });
    }

    let mut reports = Vec::with_capacity(names.len());
    for name in &names {
        let xml = fs::read_to_string(dir.join(name))?;
        reports.push(validate_fixture(name, &xml)?);
    }

    fs::write(
        dir.join(VALIDATION_RESULTS_FILE),
        serde_json::to_string_pretty(&reports)?,
    )?;
    info!(files = reports.len(), "fixture validation written");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::validate_all;
    use tempfile::TempDir;

    #[test]
    fn test_generate_then_validate() {
        let temp_dir = TempDir::new().unwrap();
        let files = generate_fixtures(temp_dir.path(), 300).unwrap();

        let counts: Vec<usize> = files.iter().map(|f| f.records).collect();
        assert_eq!(counts, vec![300, 300, 300, 300, 286, 336]);
        assert!(temp_dir.path().join(RESULTS_FILE).exists());

        let reports = validate_fixtures(temp_dir.path()).unwrap();
        assert_eq!(reports.len(), 6);
        assert!(temp_dir.path().join(VALIDATION_RESULTS_FILE).exists());

        assert_eq!(reports[0].urgent, 100);
        assert_eq!(reports[1].urgent, 300);
        assert_eq!(reports[2].urgent, 0);
        for report in &reports {
            assert!(!report.sequence_gaps, "{}", report.file);
            assert_eq!(report.invalid_amounts, 0);
            assert_eq!(report.invalid_dates, 0);
            assert_eq!(report.missing_fields, 0);
        }
        // Same invoice number everywhere, but external ids stay distinct
        assert_eq!(reports[3].duplicates, 0);
    }

    #[test]
    fn test_generated_records_pass_validation() {
        let mut rng = rand::thread_rng();
        let records = generate_records(&mut rng, 10, 1, 3);
        assert!(validate_all(&fixture_header(), &records).is_empty());
    }

    #[test]
    fn test_report_flags_bad_data() {
        let mut a = Record::new();
        a.external_id = "X".into();
        a.sequence_number = Some(1);
        a.invoice_date = "01.12.2024".into();
        let mut b = a.clone();
        b.sequence_number = Some(3);
        b.item.amount = 5.0;

        let xml = generate_xml(&fixture_header(), &[a, b]);
        let report = validate_fixture("TEST_x.xml", &xml).unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.invalid_dates, 2);
        assert_eq!(report.invalid_amounts, 1);
        assert_eq!(report.missing_fields, 5);
        assert!(report.sequence_gaps);
    }

    #[test]
    fn test_validate_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_fixtures(temp_dir.path()).unwrap_err().is_not_found());
    }
}
