//! Report formatting for sequence checks and exported-file verification

use crate::services::sequence::SequenceIssue;
use crate::services::workspace::SequenceReport;
use crate::xml::{XmlComparison, XmlSummary};

fn range(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{}..{}", min, max),
        _ => "-".to_string(),
    }
}

fn format_issues(issues: &[SequenceIssue]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "  {:<14}  {:>8}  {:>7}  {}\n",
        "Kind", "Sequence", "Records", "Details"
    ));
    output.push_str(&format!("  {:-<14}  {:->8}  {:->7}  {:-<30}\n", "", "", "", ""));
    for issue in issues {
        output.push_str(&format!(
            "  {:<14}  {:>8}  {:>7}  {}\n",
            issue.kind.to_string(),
            issue
                .sequence_number
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            issue.record_count,
            issue.details,
        ));
    }
    output
}

pub fn format_sequence_report(report: &SequenceReport) -> String {
    let integrity = &report.integrity;
    let mut output = String::new();

    output.push_str(&format!("Sequence Integrity: {}\n", integrity.status));
    output.push_str(&format!("  Records:          {}\n", integrity.total_records));
    output.push_str(&format!(
        "  Range:            {}\n",
        range(integrity.min_sequence, integrity.max_sequence)
    ));
    output.push_str(&format!("  Expected Count:   {}\n", integrity.expected_count));
    output.push_str(&format!("  Unique Numbers:   {}\n", integrity.unique_sequences));

    if !report.issues.is_empty() {
        output.push('\n');
        output.push_str(&format_issues(&report.issues));
    }

    if !report.order_issues.is_empty() {
        output.push('\n');
        output.push_str("Order checks:\n");
        for issue in &report.order_issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    if report.is_healthy() {
        output.push_str("\nNo sequence problems found.\n");
    } else {
        output.push_str("\nRun 'commitments sequence renumber' to reassign 1..N.\n");
    }

    output
}

pub fn format_xml_summary(summary: &XmlSummary) -> String {
    let mut output = String::new();

    output.push_str("XML File Summary\n");
    output.push_str(&format!("  Records:          {}\n", summary.total_records));
    output.push_str(&format!("  Urgent:           {}\n", summary.urgent_records));
    output.push_str(&format!(
        "  Duplicate Keys:   {}\n",
        summary.duplicate_keys.len()
    ));
    output.push_str(&format!(
        "  Sequence Gaps:    {}\n",
        if summary.has_sequence_gaps { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Validation:       {} error(s)\n",
        summary.validation_errors.len()
    ));

    if !summary.duplicate_keys.is_empty() {
        output.push('\n');
        output.push_str("Duplicate keys:\n");
        for key in &summary.duplicate_keys {
            output.push_str(&format!("  - {}\n", key));
        }
    }

    if !summary.validation_errors.is_empty() {
        output.push('\n');
        output.push_str("Validation errors:\n");
        for error in &summary.validation_errors {
            output.push_str(&format!("  - {}\n", error.message));
        }
    }

    output.push('\n');
    output.push_str(if summary.is_clean() {
        "File is clean.\n"
    } else {
        "File has problems.\n"
    });
    output
}

pub fn format_xml_comparison(comparison: &XmlComparison) -> String {
    let mut output = String::new();

    output.push_str("XML vs App\n");
    output.push_str(&format!(
        "  Records:          {} in file, {} in app\n",
        comparison.file_records, comparison.app_records
    ));
    output.push_str(&format!(
        "  Headers Match:    {}\n",
        if comparison.headers_match { "Yes" } else { "No" }
    ));

    let sections: [(&str, &Vec<String>); 2] = [
        ("Missing in app", &comparison.missing_in_app),
        ("Missing in file", &comparison.missing_in_file),
    ];
    for (title, keys) in sections {
        if !keys.is_empty() {
            output.push('\n');
            output.push_str(&format!("{} ({}):\n", title, keys.len()));
            for key in keys {
                output.push_str(&format!("  - {}\n", key));
            }
        }
    }

    if !comparison.sequence_mismatches.is_empty() {
        output.push('\n');
        output.push_str(&format!(
            "  {:<30}  {:>6}  {:>6}\n",
            "Key", "File", "App"
        ));
        output.push_str(&format!("  {:-<30}  {:->6}  {:->6}\n", "", "", ""));
        for mismatch in &comparison.sequence_mismatches {
            let show = |n: Option<u32>| n.map_or_else(|| "-".to_string(), |n| n.to_string());
            output.push_str(&format!(
                "  {:<30}  {:>6}  {:>6}\n",
                mismatch.key,
                show(mismatch.file_sequence),
                show(mismatch.app_sequence),
            ));
        }
    }

    output.push('\n');
    output.push_str(if comparison.is_consistent() {
        "File and app are consistent.\n"
    } else {
        "File and app differ.\n"
    });
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Header, Record};
    use crate::services::sequence::{detect, integrity, validate_order};
    use crate::xml::{compare, generate_xml, parse_xml, summarize};

    fn numbered(numbers: &[u32]) -> Vec<Record> {
        numbers
            .iter()
            .map(|n| {
                let mut record = Record::new();
                record.sequence_number = Some(*n);
                record
            })
            .collect()
    }

    fn report(records: &[Record]) -> SequenceReport {
        SequenceReport {
            issues: detect(records),
            integrity: integrity(records),
            order_issues: validate_order(records),
        }
    }

    #[test]
    fn test_healthy_sequence_report() {
        let output = format_sequence_report(&report(&numbered(&[1, 2, 3])));
        assert!(output.contains("Sequence Integrity: HEALTHY"));
        assert!(output.contains("Range:            1..3"));
        assert!(output.contains("No sequence problems found"));
    }

    #[test]
    fn test_corrupted_sequence_report() {
        let output = format_sequence_report(&report(&numbered(&[1, 1, 4])));
        assert!(output.contains("CORRUPTED"));
        assert!(output.contains("DUPLICATE"));
        assert!(output.contains("GAPS_DETECTED"));
        assert!(output.contains("sequence renumber"));
    }

    #[test]
    fn test_xml_summary_and_comparison() {
        let header = Header::defaults_for_year(2025);
        let records = numbered(&[1, 3]);
        let parsed = parse_xml(&generate_xml(&header, &records)).unwrap();

        let summary = format_xml_summary(&summarize(&parsed));
        assert!(summary.contains("Records:          2"));
        assert!(summary.contains("Sequence Gaps:    Yes"));
        assert!(summary.contains("File has problems"));

        let comparison = format_xml_comparison(&compare(&parsed, &header, &records));
        assert!(comparison.contains("2 in file, 2 in app"));
        assert!(comparison.contains("File and app are consistent"));

        let fewer = &records[..1];
        let comparison = format_xml_comparison(&compare(&parsed, &header, fewer));
        assert!(comparison.contains("Missing in app (1):"));
        assert!(comparison.contains("File and app differ"));
    }
}
