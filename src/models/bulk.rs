//! Bulk edit updates
//!
//! A bulk edit sets a small fixed group of fields on many records at once.

use super::record::Record;

/// Fields a bulk edit may set
///
/// Build it with [`BulkEdit::new`] so empty strings are dropped: a bulk edit
/// never blanks a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkEdit {
    pub invoice_number: Option<String>,
    pub invoice_type: Option<String>,
    pub invoice_date: Option<String>,
    pub due_date: Option<String>,
    pub expected_payment_date: Option<String>,
    pub contract_number: Option<String>,
    pub payment_basis: Option<String>,
    /// `Some(true)` marks urgent, `Some(false)` resets the flag
    pub urgent_payment: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl BulkEdit {
    /// Build a bulk edit, discarding empty string values
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invoice_number: Option<String>,
        invoice_type: Option<String>,
        invoice_date: Option<String>,
        due_date: Option<String>,
        expected_payment_date: Option<String>,
        contract_number: Option<String>,
        payment_basis: Option<String>,
        urgent_payment: Option<bool>,
    ) -> Self {
        Self {
            invoice_number: non_blank(invoice_number),
            invoice_type: non_blank(invoice_type),
            invoice_date: non_blank(invoice_date),
            due_date: non_blank(due_date),
            expected_payment_date: non_blank(expected_payment_date),
            contract_number: non_blank(contract_number),
            payment_basis: non_blank(payment_basis),
            urgent_payment,
        }
    }

    /// Only toggle the urgent flag
    pub fn urgent(flag: bool) -> Self {
        Self {
            urgent_payment: Some(flag),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the fields this edit changes, for log messages
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.invoice_number.is_some() {
            names.push("invoice_number");
        }
        if self.invoice_type.is_some() {
            names.push("invoice_type");
        }
        if self.invoice_date.is_some() {
            names.push("invoice_date");
        }
        if self.due_date.is_some() {
            names.push("due_date");
        }
        if self.expected_payment_date.is_some() {
            names.push("expected_payment_date");
        }
        if self.contract_number.is_some() {
            names.push("contract_number");
        }
        if self.payment_basis.is_some() {
            names.push("payment_basis");
        }
        if self.urgent_payment.is_some() {
            names.push("urgent_payment");
        }
        names
    }

    /// Set the present fields on `record`
    pub fn apply(&self, record: &mut Record) {
        if let Some(v) = &self.invoice_number {
            record.invoice_number = v.clone();
        }
        if let Some(v) = &self.invoice_type {
            record.invoice_type = v.clone();
        }
        if let Some(v) = &self.invoice_date {
            record.invoice_date = v.clone();
        }
        if let Some(v) = &self.due_date {
            record.due_date = v.clone();
        }
        if let Some(v) = &self.expected_payment_date {
            record.item.expected_payment_date = v.clone();
        }
        if let Some(v) = &self.contract_number {
            record.contract_number = v.clone();
        }
        if let Some(v) = &self.payment_basis {
            record.payment_basis = v.clone();
        }
        if let Some(flag) = self.urgent_payment {
            record.item.urgent_payment = flag;
        }
    }
}
