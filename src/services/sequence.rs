//! Sequence number integrity
//!
//! Every user's records should carry the sequence numbers 1..N exactly once.
//! This module finds duplicates, missing numbers and holes in the run, and
//! can renumber a record set from its creation order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::Record;

/// Kind of sequence anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Two or more records share a number
    Duplicate,
    /// A record has no number
    NullSequence,
    /// The sorted numbers are not a contiguous run starting at 1
    GapsDetected,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Duplicate => write!(f, "DUPLICATE"),
            IssueKind::NullSequence => write!(f, "NULL_SEQUENCE"),
            IssueKind::GapsDetected => write!(f, "GAPS_DETECTED"),
        }
    }
}

/// One detected anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceIssue {
    pub kind: IssueKind,
    /// Duplicated number, or first missing number of a gap
    pub sequence_number: Option<u32>,
    /// Records involved
    pub record_count: usize,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntegrityStatus {
    Healthy,
    Corrupted,
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityStatus::Healthy => write!(f, "HEALTHY"),
            IntegrityStatus::Corrupted => write!(f, "CORRUPTED"),
        }
    }
}

/// Aggregate health of a record set's numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceIntegrity {
    pub total_records: usize,
    pub min_sequence: Option<u32>,
    pub max_sequence: Option<u32>,
    /// Number of records a healthy set with this maximum would hold
    pub expected_count: usize,
    pub unique_sequences: usize,
    pub status: IntegrityStatus,
}

/// Outcome of a renumbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenumberResult {
    /// Records whose sequence number changed
    pub records_renumbered: usize,
}

/// Count records per sequence number
fn occurrences(records: &[Record]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for n in records.iter().filter_map(|r| r.sequence_number) {
        *counts.entry(n).or_insert(0) += 1;
    }
    counts
}

/// Detect duplicate, missing and gapped sequence numbers
///
/// Issues are reported in the order: duplicates (ascending), missing
/// numbers, gaps (ascending).
pub fn detect(records: &[Record]) -> Vec<SequenceIssue> {
    let mut issues = Vec::new();
    let counts = occurrences(records);

    for (&n, &count) in counts.iter().filter(|(_, &count)| count > 1) {
        issues.push(SequenceIssue {
            kind: IssueKind::Duplicate,
            sequence_number: Some(n),
            record_count: count,
            details: format!("Sequence number {} is used by {} records", n, count),
        });
    }

    let missing = records.iter().filter(|r| r.sequence_number.is_none()).count();
    if missing > 0 {
        issues.push(SequenceIssue {
            kind: IssueKind::NullSequence,
            sequence_number: None,
            record_count: missing,
            details: format!("{} record(s) have no sequence number", missing),
        });
    }

    // Walk the distinct numbers starting from an implicit 0
    let mut previous = 0u32;
    for &n in counts.keys() {
        if n > previous + 1 {
            let details = if previous == 0 {
                format!("Sequence starts at {} instead of 1", n)
            } else {
                format!("Gap between {} and {}", previous, n)
            };
            issues.push(SequenceIssue {
                kind: IssueKind::GapsDetected,
                sequence_number: Some(previous + 1),
                record_count: (n - previous - 1) as usize,
                details,
            });
        }
        previous = n;
    }

    issues
}

/// True when sorted sequence numbers (ignoring missing ones) skip a value
///
/// Only looks between present numbers; a run that starts above 1 is not a
/// gap here. Used when summarizing exported files.
pub fn has_gaps(records: &[Record]) -> bool {
    let mut numbers: Vec<u32> = records.iter().filter_map(|r| r.sequence_number).collect();
    numbers.sort_unstable();
    numbers.windows(2).any(|w| w[1] != w[0] + 1)
}

/// Summarize the numbering of a record set
pub fn integrity(records: &[Record]) -> SequenceIntegrity {
    let counts = occurrences(records);
    let min_sequence = counts.keys().next().copied();
    let max_sequence = counts.keys().next_back().copied();
    let expected_count = max_sequence.unwrap_or(0) as usize;

    let status = if detect(records).is_empty() {
        IntegrityStatus::Healthy
    } else {
        IntegrityStatus::Corrupted
    };

    SequenceIntegrity {
        total_records: records.len(),
        min_sequence,
        max_sequence,
        expected_count,
        unique_sequences: counts.len(),
        status,
    }
}

/// Human-readable checks over numbers and list order
///
/// Besides duplicates and gaps, flags neighbours whose numbers run backwards
/// while the earlier record is older than the later one.
pub fn validate_order(records: &[Record]) -> Vec<String> {
    let mut issues = Vec::new();
    if records.is_empty() {
        return issues;
    }

    let numbers: Vec<u32> = records.iter().filter_map(|r| r.sequence_number).collect();
    if numbers.is_empty() {
        issues.push("No sequence numbers found in records".to_string());
        return issues;
    }

    let unique = occurrences(records).len();
    if unique != numbers.len() {
        issues.push(format!(
            "Duplicate sequence numbers detected ({} total, {} unique)",
            numbers.len(),
            unique
        ));
    }

    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[1] - pair[0] > 1 {
            issues.push(format!(
                "Gap detected between sequence {} and {}",
                pair[0], pair[1]
            ));
        }
    }

    for pair in records.windows(2) {
        if let (Some(current), Some(next)) = (pair[0].sequence_number, pair[1].sequence_number) {
            if current >= next && pair[0].created_at < pair[1].created_at {
                issues.push(format!(
                    "Sequence order mismatch: record #{} is older than #{}",
                    current, next
                ));
            }
        }
    }

    issues
}

/// Number for the next new record (`max + 1`, or 1 for an empty set)
///
/// Fails when the highest number is already `u32::MAX`.
pub fn next_sequence_number(records: &[Record]) -> CommitmentResult<u32> {
    match records.iter().filter_map(|r| r.sequence_number).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            CommitmentError::InvalidInput(format!(
                "Sequence number {} is the largest allowed; run 'commitments sequence renumber' first",
                max
            ))
        }),
    }
}

/// Label shown in listings: the sequence number, else `{position}*`
pub fn display_number(record: &Record, fallback_index: usize) -> String {
    match record.sequence_number {
        Some(n) => n.to_string(),
        None => format!("{}*", fallback_index + 1),
    }
}

/// Reassign 1..N by creation time, ties broken by current list position
///
/// The list is reordered into the new sequence order.
pub fn renumber(records: &mut Vec<Record>) -> RenumberResult {
    // sort_by_key is stable, so equal timestamps keep their relative order
    records.sort_by_key(|r| r.created_at);

    let mut changed = 0;
    for (index, record) in records.iter_mut().enumerate() {
        let number = (index + 1) as u32;
        if record.sequence_number != Some(number) {
            record.sequence_number = Some(number);
            changed += 1;
        }
    }

    RenumberResult {
        records_renumbered: changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn with_numbers(numbers: &[Option<u32>]) -> Vec<Record> {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        numbers
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let mut record = Record::new();
                record.sequence_number = *n;
                record.created_at = base + Duration::minutes(i as i64);
                record
            })
            .collect()
    }

    #[test]
    fn test_healthy_set_has_no_issues() {
        let records = with_numbers(&[Some(1), Some(2), Some(3)]);
        assert!(detect(&records).is_empty());
        assert_eq!(integrity(&records).status, IntegrityStatus::Healthy);
    }

    #[test]
    fn test_duplicate_and_gap() {
        let records = with_numbers(&[Some(1), Some(2), Some(2), Some(4)]);
        let issues = detect(&records);

        let duplicates: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::Duplicate)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].sequence_number, Some(2));
        assert_eq!(duplicates[0].record_count, 2);

        let gaps: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::GapsDetected)
            .collect();
        assert_eq!(gaps.len(), 1);
        assert_ne!(gaps[0].sequence_number, Some(2));
        assert_eq!(gaps[0].sequence_number, Some(3));
        assert_eq!(gaps[0].details, "Gap between 2 and 4");
    }

    #[test]
    fn test_missing_numbers_reported_once() {
        let records = with_numbers(&[Some(1), None, None]);
        let issues = detect(&records);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::NullSequence);
        assert_eq!(issues[0].record_count, 2);
    }

    #[test]
    fn test_run_must_start_at_one() {
        let records = with_numbers(&[Some(3), Some(4)]);
        let issues = detect(&records);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::GapsDetected);
        assert_eq!(issues[0].sequence_number, Some(1));
        assert_eq!(issues[0].record_count, 2);
        assert!(!has_gaps(&records));
    }

    #[test]
    fn test_integrity_summary() {
        let records = with_numbers(&[Some(1), Some(2), Some(2), Some(5), None]);
        let summary = integrity(&records);
        assert_eq!(summary.total_records, 5);
        assert_eq!(summary.min_sequence, Some(1));
        assert_eq!(summary.max_sequence, Some(5));
        assert_eq!(summary.expected_count, 5);
        assert_eq!(summary.unique_sequences, 3);
        assert_eq!(summary.status, IntegrityStatus::Corrupted);
    }

    #[test]
    fn test_renumber_orders_by_creation_time() {
        let mut records = with_numbers(&[Some(7), Some(2), None, Some(2)]);
        // Make the last record the oldest
        records[3].created_at = records[0].created_at - Duration::hours(1);
        let oldest = records[3].id;
        let newest = records[2].id;

        let result = renumber(&mut records);

        let numbers: Vec<_> = records.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(records[0].id, oldest);
        assert_eq!(records[3].id, newest);
        assert_eq!(result.records_renumbered, 4);
        assert!(detect(&records).is_empty());
    }

    #[test]
    fn test_renumber_ties_keep_list_order() {
        let mut records = with_numbers(&[None, None, None]);
        let stamp = records[0].created_at;
        for r in records.iter_mut() {
            r.created_at = stamp;
        }
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();

        renumber(&mut records);

        let after: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn test_renumber_healthy_set_touches_nothing() {
        let mut records = with_numbers(&[Some(1), Some(2)]);
        assert_eq!(renumber(&mut records).records_renumbered, 0);
    }

    #[test]
    fn test_next_sequence_number() {
        assert_eq!(next_sequence_number(&[]).unwrap(), 1);
        let records = with_numbers(&[Some(1), None, Some(9)]);
        assert_eq!(next_sequence_number(&records).unwrap(), 10);
    }

    #[test]
    fn test_next_sequence_number_at_limit() {
        let records = with_numbers(&[Some(1), Some(u32::MAX)]);
        let err = next_sequence_number(&records).unwrap_err();
        assert!(matches!(err, CommitmentError::InvalidInput(_)));
    }

    #[test]
    fn test_display_number() {
        let records = with_numbers(&[Some(4), None]);
        assert_eq!(display_number(&records[0], 0), "4");
        assert_eq!(display_number(&records[1], 1), "2*");
    }

    #[test]
    fn test_validate_order_flags_backwards_neighbours() {
        let records = with_numbers(&[Some(2), Some(1)]);
        let issues = validate_order(&records);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Sequence order mismatch"));
    }

    #[test]
    fn test_validate_order_without_numbers() {
        let records = with_numbers(&[None]);
        assert_eq!(
            validate_order(&records),
            vec!["No sequence numbers found in records".to_string()]
        );
        assert!(validate_order(&[]).is_empty());
    }
}
