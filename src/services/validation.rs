//! Field validation for headers and records
//!
//! Validation never fails; it returns a list of labeled errors. An empty list
//! means the data may be exported.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Header, Record, RecordId};

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// `treasury`, `records`, `record_0_item_amount`, ...
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            record_id: None,
        }
    }

    fn for_record(record: &Record, field: String, message: String) -> Self {
        Self {
            field,
            message,
            record_id: Some(record.id),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the five required header fields
pub fn validate_header(header: &Header) -> Vec<ValidationError> {
    let checks = [
        (
            &header.cumulative_reason_code,
            "cumulative_reason_code",
            "Cumulative reason code is required",
        ),
        (&header.budget_year, "budget_year", "Budget year is required"),
        (&header.budget_user_id, "budget_user_id", "Budget user ID is required"),
        (&header.currency_code, "currency_code", "Currency code is required"),
        (&header.treasury, "treasury", "Treasury is required"),
    ];

    checks
        .iter()
        .filter(|(value, _, _)| blank(value))
        .map(|(_, field, message)| ValidationError::new(*field, *message))
        .collect()
}

/// Check one record at zero-based position `index`
pub fn validate_record(record: &Record, index: usize) -> Vec<ValidationError> {
    let prefix = format!("record_{}", index);
    let row = index + 1;
    let item = &record.item;

    let leading: [(&str, &str, &str); 11] = [
        (&record.reason_code, "reason_code", "Reason code is required"),
        (&record.recipient, "recipient", "Recipient is required"),
        (&record.recipient_place, "recipient_place", "Recipient place is required"),
        (&record.account_number, "account_number", "Account number is required"),
        (&record.invoice_date, "invoice_date", "Invoice date is required"),
        (&record.due_date, "due_date", "Due date is required"),
        (
            &item.budget_user_id,
            "item_budget_user_id",
            "Item budget user ID is required",
        ),
        (&item.program_code, "item_program_code", "Item program code is required"),
        (
            &item.economic_classification_code,
            "item_economic_classification_code",
            "Item economic classification code is required",
        ),
        (
            &item.source_of_funding_code,
            "item_source_of_funding_code",
            "Item source of funding code is required",
        ),
        (&item.function_code, "item_function_code", "Item function code is required"),
    ];
    let trailing: [(&str, &str, &str); 2] = [
        (
            &item.recording_account,
            "item_recording_account",
            "Item recording account is required",
        ),
        (
            &item.expected_payment_date,
            "item_expected_payment_date",
            "Item expected payment date is required",
        ),
    ];

    let mut errors = Vec::new();
    let require = |checks: &[(&str, &str, &str)], errors: &mut Vec<ValidationError>| {
        for (value, field, message) in checks {
            if blank(value) {
                errors.push(ValidationError::for_record(
                    record,
                    format!("{}_{}", prefix, field),
                    format!("Row {}: {}", row, message),
                ));
            }
        }
    };

    require(&leading[..], &mut errors);
    if !(item.amount.is_finite() && item.amount > 0.0) {
        errors.push(ValidationError::for_record(
            record,
            format!("{}_item_amount", prefix),
            format!("Row {}: Item amount must be greater than 0", row),
        ));
    }
    require(&trailing[..], &mut errors);
    errors
}

/// Header errors, then the empty-list error or every record's errors
pub fn validate_all(header: &Header, records: &[Record]) -> Vec<ValidationError> {
    let mut errors = validate_header(header);

    if records.is_empty() {
        errors.push(ValidationError::new(
            "records",
            "At least one record is required",
        ));
    } else {
        for (index, record) in records.iter().enumerate() {
            errors.extend(validate_record(record, index));
        }
    }

    errors
}
