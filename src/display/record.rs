//! Record and header display formatting
//!
//! Formats commitments for terminal output in table and detail views.

use crate::models::{Header, Record};
use crate::services::sequence::display_number;
use crate::services::validation::ValidationError;
use crate::services::workspace::Page;

const RECIPIENT_MAX: usize = 28;

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Format one page of records as a table
///
/// Each row carries the record's zero-based position in the full list so
/// unnumbered records show as `{position}*`.
pub fn format_record_page(page: &Page<(usize, Record)>, currency: &str) -> String {
    if page.total_items == 0 {
        return "No records found.\n".to_string();
    }

    let mut output = format_record_rows(&page.items, currency);
    output.push_str(&format!(
        "\nPage {} of {} ({} records)\n",
        page.page, page.total_pages, page.total_items
    ));
    output
}

/// Format records as a table without paging
pub fn format_record_rows(rows: &[(usize, Record)], currency: &str) -> String {
    if rows.is_empty() {
        return "No records found.\n".to_string();
    }

    let recipient_width = RECIPIENT_MAX;
    let invoice_width = rows
        .iter()
        .map(|(_, r)| r.invoice_number.len())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<8}  {:<recipient_width$}  {:<invoice_width$}  {:<10}  {:>14}  {}\n",
        "Seq",
        "ID",
        "Recipient",
        "Invoice",
        "Due",
        format!("Amount {}", currency),
        "Urgent",
        invoice_width = invoice_width,
    ));
    output.push_str(&format!(
        "{:->5}  {:-<8}  {:-<recipient_width$}  {:-<invoice_width$}  {:-<10}  {:->14}  {:-<6}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        invoice_width = invoice_width,
    ));

    for (index, record) in rows {
        output.push_str(&format!(
            "{:>5}  {:<8}  {:<recipient_width$}  {:<invoice_width$}  {:<10}  {:>14.2}  {}\n",
            display_number(record, *index),
            record.id.short(),
            truncate(&record.recipient, RECIPIENT_MAX),
            record.invoice_number,
            record.due_date,
            record.item.amount,
            if record.item.urgent_payment { "yes" } else { "" },
            invoice_width = invoice_width,
        ));
    }

    let total: f64 = rows.iter().map(|(_, r)| r.item.amount).sum();
    output.push_str(&format!(
        "{:>5}  {:<8}  {:<recipient_width$}  {:<invoice_width$}  {:<10}  {:>14.2}\n",
        "",
        "",
        "TOTAL",
        "",
        "",
        total,
        invoice_width = invoice_width,
    ));

    output
}

/// Format a single record's details
pub fn format_record_details(record: &Record, index: usize) -> String {
    let item = &record.item;
    let mut output = String::new();

    output.push_str(&format!(
        "Commitment #{}: {}\n",
        display_number(record, index),
        or_dash(&record.recipient)
    ));
    output.push_str(&format!("  ID:               {}\n", record.id));
    output.push_str(&format!("  External ID:      {}\n", or_dash(&record.external_id)));
    output.push_str(&format!("  Reason Code:      {}\n", or_dash(&record.reason_code)));
    output.push_str(&format!("  Place:            {}\n", or_dash(&record.recipient_place)));
    output.push_str(&format!("  Account:          {}\n", or_dash(&record.account_number)));
    output.push('\n');
    output.push_str(&format!("  Invoice:          {}\n", or_dash(&record.invoice_number)));
    output.push_str(&format!("  Invoice Type:     {}\n", or_dash(&record.invoice_type)));
    output.push_str(&format!("  Invoice Date:     {}\n", or_dash(&record.invoice_date)));
    output.push_str(&format!("  Due Date:         {}\n", or_dash(&record.due_date)));
    output.push_str(&format!("  Contract:         {}\n", or_dash(&record.contract_number)));
    output.push_str(&format!("  Payment Code:     {}\n", or_dash(&record.payment_code)));
    output.push_str(&format!(
        "  Credit Reference: {} {}\n",
        or_dash(&record.credit_model),
        record.credit_reference_number
    ));
    output.push_str(&format!("  Payment Basis:    {}\n", or_dash(&record.payment_basis)));

    output.push('\n');
    output.push_str("  Item:\n");
    output.push_str(&format!("    Budget User:    {}\n", or_dash(&item.budget_user_id)));
    output.push_str(&format!("    Program:        {}\n", or_dash(&item.program_code)));
    output.push_str(&format!("    Project:        {}\n", or_dash(&item.project_code)));
    output.push_str(&format!(
        "    Economic Code:  {}\n",
        or_dash(&item.economic_classification_code)
    ));
    output.push_str(&format!("    Funding Source: {}\n", or_dash(&item.source_of_funding_code)));
    output.push_str(&format!("    Function:       {}\n", or_dash(&item.function_code)));
    output.push_str(&format!("    Amount:         {:.2}\n", item.amount));
    output.push_str(&format!("    Recording Acct: {}\n", or_dash(&item.recording_account)));
    output.push_str(&format!("    Posting Acct:   {}\n", or_dash(&item.posting_account)));
    output.push_str(&format!(
        "    Expected Pay:   {}\n",
        or_dash(&item.expected_payment_date)
    ));
    output.push_str(&format!(
        "    Urgent:         {}\n",
        if item.urgent_payment { "Yes" } else { "No" }
    ));

    output.push('\n');
    output.push_str(&format!(
        "  Created: {}\n",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

pub fn format_header(header: &Header) -> String {
    let mut output = String::new();
    output.push_str("Header\n");
    output.push_str(&format!(
        "  Cumulative Reason Code: {}\n",
        or_dash(&header.cumulative_reason_code)
    ));
    output.push_str(&format!("  Budget Year:            {}\n", or_dash(&header.budget_year)));
    output.push_str(&format!(
        "  Budget User ID:         {}\n",
        or_dash(&header.budget_user_id)
    ));
    output.push_str(&format!("  Currency Code:          {}\n", or_dash(&header.currency_code)));
    output.push_str(&format!("  Treasury:               {}\n", or_dash(&header.treasury)));
    output
}

/// One line per error, header errors first
pub fn format_validation_errors(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return "All checks passed.\n".to_string();
    }

    let mut output = format!("{} validation error(s):\n", errors.len());
    for error in errors {
        output.push_str(&format!("  - {}\n", error.message));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::validate_all;
    use crate::services::workspace::page;

    fn rows() -> Vec<(usize, Record)> {
        let mut first = Record::new();
        first.sequence_number = Some(1);
        first.recipient = "A very long recipient name that will not fit".into();
        first.invoice_number = "INV-0001".into();
        first.item.amount = 1500.0;
        first.item.urgent_payment = true;
        let mut second = Record::new();
        second.item.amount = 20.5;
        vec![(0, first), (1, second)]
    }

    #[test]
    fn test_format_record_page() {
        let all = rows();
        let output = format_record_page(&page(&all, 1, 20), "RSD");

        assert!(output.contains("Amount RSD"));
        assert!(output.contains("A very long recipient nam..."));
        assert!(output.contains("1500.00"));
        assert!(output.contains("1520.50"));
        assert!(output.contains("2*"));
        assert!(output.contains("Page 1 of 1 (2 records)"));
    }

    #[test]
    fn test_format_empty_page() {
        let output = format_record_page(&page(&[], 1, 20), "RSD");
        assert!(output.contains("No records found"));
    }

    #[test]
    fn test_format_record_details() {
        let (_, record) = rows().remove(0);
        let output = format_record_details(&record, 0);

        assert!(output.starts_with("Commitment #1:"));
        assert!(output.contains("INV-0001"));
        assert!(output.contains("Urgent:         Yes"));
        assert!(output.contains("Program:        -"));
    }

    #[test]
    fn test_format_validation_errors() {
        assert!(format_validation_errors(&[]).contains("All checks passed"));

        let errors = validate_all(&Header::empty(), &[]);
        let output = format_validation_errors(&errors);
        assert!(output.starts_with("6 validation error(s):"));
        assert!(output.contains("Treasury is required"));
        assert!(output.contains("At least one record is required"));
    }

    #[test]
    fn test_format_header() {
        let output = format_header(&Header::defaults_for_year(2025));
        assert!(output.contains("Budget Year:            2025"));
        assert!(output.contains("Treasury:               -"));
    }
}
