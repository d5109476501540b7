//! Commitment record model
//!
//! A record is one budget obligation (invoice) with an embedded budget
//! classification item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RecordId;

/// Budget classification attached to a commitment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecordItem {
    pub budget_user_id: String,
    pub program_code: String,
    pub project_code: String,
    pub economic_classification_code: String,
    pub source_of_funding_code: String,
    pub function_code: String,
    /// Non-negative amount in the header's currency
    pub amount: f64,
    pub recording_account: String,
    pub expected_payment_date: String,
    pub urgent_payment: bool,
    pub posting_account: String,
}

/// A single commitment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    /// Per-user ordinal; expected to form a contiguous 1..N run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u32>,

    #[serde(default)]
    pub reason_code: String,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub recipient_place: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub invoice_type: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub contract_number: String,
    #[serde(default)]
    pub payment_code: String,
    #[serde(default)]
    pub credit_model: String,
    #[serde(default)]
    pub credit_reference_number: String,
    #[serde(default)]
    pub payment_basis: String,

    #[serde(default)]
    pub item: RecordItem,

    /// Creation time, used to order records when renumbering
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self {
            id: RecordId::new(),
            sequence_number: None,
            reason_code: String::new(),
            external_id: String::new(),
            recipient: String::new(),
            recipient_place: String::new(),
            account_number: String::new(),
            invoice_number: String::new(),
            invoice_type: String::new(),
            invoice_date: String::new(),
            due_date: String::new(),
            contract_number: String::new(),
            payment_code: String::new(),
            credit_model: String::new(),
            credit_reference_number: String::new(),
            payment_basis: String::new(),
            item: RecordItem::default(),
            created_at: Utc::now(),
        }
    }

    /// Create a record pre-filled from `previous`
    ///
    /// Identity fields (id, sequence number, external id, invoice number,
    /// creation time) and the amount are not carried over.
    pub fn prefilled_from(previous: &Record) -> Self {
        let mut record = previous.clone();
        record.id = RecordId::new();
        record.sequence_number = None;
        record.external_id = String::new();
        record.invoice_number = String::new();
        record.item.amount = 0.0;
        record.created_at = Utc::now();
        record
    }

    /// Key used to match records across an exported file and the app
    ///
    /// External id, else invoice number, else the record id.
    pub fn match_key(&self) -> String {
        if !self.external_id.is_empty() {
            self.external_id.clone()
        } else if !self.invoice_number.is_empty() {
            self.invoice_number.clone()
        } else {
            self.id.to_string()
        }
    }

    /// Case-insensitive search over recipient, invoice number, account
    /// number and external id
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            &self.recipient,
            &self.invoice_number,
            &self.account_number,
            &self.external_id,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional replacements for any record or item field
///
/// Used by record creation and single-record edits. Every field is applied
/// explicitly in [`RecordPatch::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub reason_code: Option<String>,
    pub external_id: Option<String>,
    pub recipient: Option<String>,
    pub recipient_place: Option<String>,
    pub account_number: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_type: Option<String>,
    pub invoice_date: Option<String>,
    pub due_date: Option<String>,
    pub contract_number: Option<String>,
    pub payment_code: Option<String>,
    pub credit_model: Option<String>,
    pub credit_reference_number: Option<String>,
    pub payment_basis: Option<String>,
    pub item_budget_user_id: Option<String>,
    pub item_program_code: Option<String>,
    pub item_project_code: Option<String>,
    pub item_economic_classification_code: Option<String>,
    pub item_source_of_funding_code: Option<String>,
    pub item_function_code: Option<String>,
    pub item_amount: Option<f64>,
    pub item_recording_account: Option<String>,
    pub item_expected_payment_date: Option<String>,
    pub item_urgent_payment: Option<bool>,
    pub item_posting_account: Option<String>,
}

fn set(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Write every present field into `record`
    pub fn apply(&self, record: &mut Record) {
        set(&mut record.reason_code, &self.reason_code);
        set(&mut record.external_id, &self.external_id);
        set(&mut record.recipient, &self.recipient);
        set(&mut record.recipient_place, &self.recipient_place);
        set(&mut record.account_number, &self.account_number);
        set(&mut record.invoice_number, &self.invoice_number);
        set(&mut record.invoice_type, &self.invoice_type);
        set(&mut record.invoice_date, &self.invoice_date);
        set(&mut record.due_date, &self.due_date);
        set(&mut record.contract_number, &self.contract_number);
        set(&mut record.payment_code, &self.payment_code);
        set(&mut record.credit_model, &self.credit_model);
        set(&mut record.credit_reference_number, &self.credit_reference_number);
        set(&mut record.payment_basis, &self.payment_basis);

        let item = &mut record.item;
        set(&mut item.budget_user_id, &self.item_budget_user_id);
        set(&mut item.program_code, &self.item_program_code);
        set(&mut item.project_code, &self.item_project_code);
        set(
            &mut item.economic_classification_code,
            &self.item_economic_classification_code,
        );
        set(&mut item.source_of_funding_code, &self.item_source_of_funding_code);
        set(&mut item.function_code, &self.item_function_code);
        if let Some(amount) = self.item_amount {
            item.amount = amount;
        }
        set(&mut item.recording_account, &self.item_recording_account);
        set(&mut item.expected_payment_date, &self.item_expected_payment_date);
        if let Some(urgent) = self.item_urgent_payment {
            item.urgent_payment = urgent;
        }
        set(&mut item.posting_account, &self.item_posting_account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut record = Record::new();
        record.sequence_number = Some(3);
        record.reason_code = "R1".into();
        record.external_id = "77".into();
        record.recipient = "Acme d.o.o.".into();
        record.invoice_number = "INV-0001".into();
        record.account_number = "160-123-45".into();
        record.item.amount = 1500.0;
        record.item.program_code = "0701".into();
        record
    }

    #[test]
    fn test_prefill_drops_identity_fields() {
        let previous = sample();
        let next = Record::prefilled_from(&previous);

        assert_ne!(next.id, previous.id);
        assert_eq!(next.sequence_number, None);
        assert!(next.external_id.is_empty());
        assert!(next.invoice_number.is_empty());
        assert_eq!(next.item.amount, 0.0);
        assert_eq!(next.recipient, "Acme d.o.o.");
        assert_eq!(next.item.program_code, "0701");
    }

    #[test]
    fn test_match_key_fallbacks() {
        let mut record = sample();
        assert_eq!(record.match_key(), "77");
        record.external_id.clear();
        assert_eq!(record.match_key(), "INV-0001");
        record.invoice_number.clear();
        assert_eq!(record.match_key(), record.id.to_string());
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let record = sample();
        assert!(record.matches_query("acme"));
        assert!(record.matches_query("inv-0001"));
        assert!(record.matches_query("160-123"));
        assert!(record.matches_query(""));
        assert!(!record.matches_query("0701"));
    }

    #[test]
    fn test_patch_applies_present_fields_only() {
        let mut record = sample();
        let patch = RecordPatch {
            recipient: Some("Beta".into()),
            item_amount: Some(99.5),
            item_urgent_payment: Some(true),
            ..Default::default()
        };
        patch.apply(&mut record);

        assert_eq!(record.recipient, "Beta");
        assert_eq!(record.item.amount, 99.5);
        assert!(record.item.urgent_payment);
        assert_eq!(record.invoice_number, "INV-0001");
        assert_eq!(record.item.program_code, "0701");
    }

    #[test]
    fn test_patch_can_blank_a_field() {
        let mut record = sample();
        let patch = RecordPatch {
            external_id: Some(String::new()),
            ..Default::default()
        };
        patch.apply(&mut record);
        assert!(record.external_id.is_empty());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let id = RecordId::new();
        let json = format!(r#"{{"id": "{}", "recipient": "X"}}"#, id.as_uuid());
        let record: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.sequence_number, None);
        assert_eq!(record.item, RecordItem::default());
    }
}
