//! CSV export of the record list
//!
//! One row per record with the header's currency and budget year repeated
//! on every row, for spreadsheet use.

use std::io::Write;

use serde::Serialize;

use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{Header, Record};
use crate::services::sequence::display_number;

#[derive(Debug, Serialize)]
struct RecordRow<'r> {
    #[serde(rename = "Seq")]
    seq: String,
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "External ID")]
    external_id: &'r str,
    #[serde(rename = "Recipient")]
    recipient: &'r str,
    #[serde(rename = "Place")]
    recipient_place: &'r str,
    #[serde(rename = "Account")]
    account_number: &'r str,
    #[serde(rename = "Invoice")]
    invoice_number: &'r str,
    #[serde(rename = "Invoice Type")]
    invoice_type: &'r str,
    #[serde(rename = "Invoice Date")]
    invoice_date: &'r str,
    #[serde(rename = "Due Date")]
    due_date: &'r str,
    #[serde(rename = "Program")]
    program_code: &'r str,
    #[serde(rename = "Economic Code")]
    economic_classification_code: &'r str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Currency")]
    currency: &'r str,
    #[serde(rename = "Budget Year")]
    budget_year: &'r str,
    #[serde(rename = "Expected Payment")]
    expected_payment_date: &'r str,
    #[serde(rename = "Urgent")]
    urgent: bool,
}

fn export_error(err: impl std::fmt::Display) -> CommitmentError {
    CommitmentError::Export(err.to_string())
}

/// Write every record as CSV
pub fn export_records_csv<W: Write>(
    header: &Header,
    records: &[Record],
    writer: W,
) -> CommitmentResult<()> {
    let mut out = csv::Writer::from_writer(writer);

    for (index, record) in records.iter().enumerate() {
        out.serialize(RecordRow {
            seq: display_number(record, index),
            id: record.id.as_uuid().to_string(),
            external_id: &record.external_id,
            recipient: &record.recipient,
            recipient_place: &record.recipient_place,
            account_number: &record.account_number,
            invoice_number: &record.invoice_number,
            invoice_type: &record.invoice_type,
            invoice_date: &record.invoice_date,
            due_date: &record.due_date,
            program_code: &record.item.program_code,
            economic_classification_code: &record.item.economic_classification_code,
            amount: format!("{:.2}", record.item.amount),
            currency: &header.currency_code,
            budget_year: &header.budget_year,
            expected_payment_date: &record.item.expected_payment_date,
            urgent: record.item.urgent_payment,
        })
        .map_err(export_error)?;
    }

    out.flush().map_err(export_error)?;
    Ok(())
}
