//! XML generation
//!
//! Builds the `<commitments>` document by string templating. Attribute and
//! text values go through `quick_xml::escape::escape`, which replaces
//! `& < > " '` with entities.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::models::{Header, Record};

/// External id written for the record at zero-based `index`
///
/// A blank id falls back to the 1-based row position. A non-blank invoice
/// number is appended as `{id}-{invoice_number}`.
pub fn computed_external_id(record: &Record, index: usize) -> String {
    let mut external_id = record.external_id.trim().to_string();
    if external_id.is_empty() {
        external_id = (index + 1).to_string();
    }

    let invoice_number = record.invoice_number.trim();
    if !invoice_number.is_empty() {
        external_id = format!("{}-{}", external_id, invoice_number);
    }

    external_id
}

fn attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape(value));
}

fn element(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "      <{name}>{}</{name}>", escape(value));
}

/// Serialize a header and its records
pub fn generate_xml(header: &Header, records: &[Record]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

    xml.push_str("<commitments");
    attr(&mut xml, "cumulative_reason_code", &header.cumulative_reason_code);
    attr(&mut xml, "budget_year", &header.budget_year);
    attr(&mut xml, "budget_user_id", &header.budget_user_id);
    attr(&mut xml, "currency_code", &header.currency_code);
    attr(&mut xml, "treasury", &header.treasury);
    xml.push_str(">\n");

    for (index, record) in records.iter().enumerate() {
        write_commitment(&mut xml, record, &computed_external_id(record, index));
    }

    xml.push_str("</commitments>");
    xml
}

fn write_commitment(xml: &mut String, record: &Record, external_id: &str) {
    xml.push_str("  <commitment");
    if let Some(n) = record.sequence_number {
        let _ = write!(xml, " sequence_number=\"{}\"", n);
    }
    attr(xml, "reason_code", &record.reason_code);
    attr(xml, "external_id", external_id);
    attr(xml, "recipient", &record.recipient);
    attr(xml, "recipient_place", &record.recipient_place);
    attr(xml, "account_number", &record.account_number);
    attr(xml, "invoice_number", &record.invoice_number);
    attr(xml, "invoice_type", &record.invoice_type);
    attr(xml, "invoice_date", &record.invoice_date);
    attr(xml, "due_date", &record.due_date);
    attr(xml, "contract_number", &record.contract_number);
    attr(xml, "payment_code", &record.payment_code);
    attr(xml, "credit_model", &record.credit_model);
    attr(xml, "credit_reference_number", &record.credit_reference_number);
    attr(xml, "payment_basis", &record.payment_basis);
    xml.push_str(">\n");

    let item = &record.item;
    xml.push_str("    <item>\n");
    element(xml, "budget_user_id", &item.budget_user_id);
    element(xml, "program_code", &item.program_code);
    element(xml, "project_code", &item.project_code);
    element(
        xml,
        "economic_classification_code",
        &item.economic_classification_code,
    );
    element(xml, "source_of_funding_code", &item.source_of_funding_code);
    element(xml, "function_code", &item.function_code);
    element(xml, "amount", &item.amount.to_string());
    element(xml, "recording_account", &item.recording_account);
    element(xml, "expected_payment_date", &item.expected_payment_date);
    element(
        xml,
        "urgent_payment",
        if item.urgent_payment { "true" } else { "false" },
    );
    element(xml, "posting_account", &item.posting_account);
    xml.push_str("    </item>\n");
    xml.push_str("  </commitment>\n");
}
