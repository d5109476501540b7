//! Checks run against an exported file
//!
//! `summarize` looks at a parsed file on its own; `compare` lines it up with
//! the records currently held by the app.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::ParsedXml;
use crate::models::{Header, Record};
use crate::services::sequence::has_gaps;
use crate::services::validation::{validate_all, ValidationError};

#[derive(Debug, Clone, Serialize)]
pub struct XmlSummary {
    pub total_records: usize,
    pub urgent_records: usize,
    /// Match keys seen more than once, sorted
    pub duplicate_keys: Vec<String>,
    pub has_sequence_gaps: bool,
    pub validation_errors: Vec<ValidationError>,
}

impl XmlSummary {
    pub fn is_clean(&self) -> bool {
        self.duplicate_keys.is_empty()
            && !self.has_sequence_gaps
            && self.validation_errors.is_empty()
    }
}

/// Sequence numbers that differ for the same key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceMismatch {
    pub key: String,
    pub file_sequence: Option<u32>,
    pub app_sequence: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct XmlComparison {
    pub file_records: usize,
    pub app_records: usize,
    pub missing_in_app: Vec<String>,
    pub missing_in_file: Vec<String>,
    pub sequence_mismatches: Vec<SequenceMismatch>,
    pub headers_match: bool,
}

impl XmlComparison {
    pub fn is_consistent(&self) -> bool {
        self.file_records == self.app_records
            && self.missing_in_app.is_empty()
            && self.missing_in_file.is_empty()
            && self.sequence_mismatches.is_empty()
            && self.headers_match
    }
}

pub fn summarize(parsed: &ParsedXml) -> XmlSummary {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in &parsed.records {
        *counts.entry(record.match_key()).or_insert(0) += 1;
    }

    XmlSummary {
        total_records: parsed.records.len(),
        urgent_records: parsed
            .records
            .iter()
            .filter(|r| r.item.urgent_payment)
            .count(),
        duplicate_keys: counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key)
            .collect(),
        has_sequence_gaps: has_gaps(&parsed.records),
        validation_errors: validate_all(&parsed.header, &parsed.records),
    }
}

/// Compare a parsed file with the app's header and records
///
/// App records are keyed with the same external id the writer would emit, so
/// a freshly exported file compares clean.
pub fn compare(parsed: &ParsedXml, app_header: &Header, app_records: &[Record]) -> XmlComparison {
    let file_by_key: HashMap<String, &Record> = parsed
        .records
        .iter()
        .map(|r| (r.match_key(), r))
        .collect();
    let app_by_key: HashMap<String, &Record> = app_records
        .iter()
        .enumerate()
        .map(|(index, r)| (super::writer::computed_external_id(r, index), r))
        .collect();

    let file_keys: HashSet<&String> = file_by_key.keys().collect();
    let app_keys: HashSet<&String> = app_by_key.keys().collect();

    let mut missing_in_app: Vec<String> = file_keys
        .difference(&app_keys)
        .map(|k| (*k).clone())
        .collect();
    missing_in_app.sort();

    let mut missing_in_file: Vec<String> = app_keys
        .difference(&file_keys)
        .map(|k| (*k).clone())
        .collect();
    missing_in_file.sort();

    let mut sequence_mismatches: Vec<SequenceMismatch> = file_by_key
        .iter()
        .filter_map(|(key, file_record)| {
            let app_record = app_by_key.get(key)?;
            (file_record.sequence_number != app_record.sequence_number).then(|| SequenceMismatch {
                key: key.clone(),
                file_sequence: file_record.sequence_number,
                app_sequence: app_record.sequence_number,
            })
        })
        .collect();
    sequence_mismatches.sort_by(|a, b| a.key.cmp(&b.key));

    XmlComparison {
        file_records: parsed.records.len(),
        app_records: app_records.len(),
        missing_in_app,
        missing_in_file,
        sequence_mismatches,
        headers_match: &parsed.header == app_header,
    }
}
