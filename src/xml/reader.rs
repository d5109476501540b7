//! XML parsing
//!
//! Streams events from `quick_xml` and rebuilds the header and record list.
//! Anything the reader rejects, plus unclosed elements at end of input, is
//! reported as `Invalid XML format: ...`.

use std::collections::HashMap;
use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ParsedXml;
use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{Header, Record, RecordItem};

fn malformed(err: impl Display) -> CommitmentError {
    CommitmentError::Parse(format!("Invalid XML format: {}", err))
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> CommitmentResult<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

/// Integer at the start of `text` ("2.5" reads as 2); `None` when there is none
fn leading_integer(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let sign = usize::from(text.starts_with('+'));
    let digits = text[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - sign);
    text[..sign + digits].parse().ok()
}

/// Longest decimal number at the start of `text` ("12abc" reads as 12)
fn leading_float(text: &str) -> Option<f64> {
    let numeric = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    (1..=numeric)
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
}

fn header_from(attrs: &HashMap<String, String>) -> Header {
    let get = |key: &str| attrs.get(key).cloned().unwrap_or_default();
    Header {
        cumulative_reason_code: get("cumulative_reason_code"),
        budget_year: get("budget_year"),
        budget_user_id: get("budget_user_id"),
        currency_code: get("currency_code"),
        treasury: get("treasury"),
    }
}

fn record_from(attrs: &HashMap<String, String>) -> Record {
    let get = |key: &str| attrs.get(key).cloned().unwrap_or_default();
    let mut record = Record::new();
    record.sequence_number = attrs
        .get("sequence_number")
        .and_then(|value| leading_integer(value));
    record.reason_code = get("reason_code");
    record.external_id = get("external_id");
    record.recipient = get("recipient");
    record.recipient_place = get("recipient_place");
    record.account_number = get("account_number");
    record.invoice_number = get("invoice_number");
    record.invoice_type = get("invoice_type");
    record.invoice_date = get("invoice_date");
    record.due_date = get("due_date");
    record.contract_number = get("contract_number");
    record.payment_code = get("payment_code");
    record.credit_model = get("credit_model");
    record.credit_reference_number = get("credit_reference_number");
    record.payment_basis = get("payment_basis");
    record
}

fn set_item_field(item: &mut RecordItem, field: &str, text: &str) {
    let value = text.trim();
    match field {
        "budget_user_id" => item.budget_user_id = value.to_string(),
        "program_code" => item.program_code = value.to_string(),
        "project_code" => item.project_code = value.to_string(),
        "economic_classification_code" => item.economic_classification_code = value.to_string(),
        "source_of_funding_code" => item.source_of_funding_code = value.to_string(),
        "function_code" => item.function_code = value.to_string(),
        "amount" => {
            item.amount = leading_float(value)
                .filter(|amount| amount.is_finite())
                .unwrap_or(0.0)
        }
        "recording_account" => item.recording_account = value.to_string(),
        "expected_payment_date" => item.expected_payment_date = value.to_string(),
        "urgent_payment" => item.urgent_payment = value.eq_ignore_ascii_case("true"),
        "posting_account" => item.posting_account = value.to_string(),
        _ => {}
    }
}

/// Commitment under construction
struct Pending {
    record: Record,
    /// 1-based position among `<commitment>` elements
    position: usize,
    has_item: bool,
}

/// Document state between events
#[derive(Default)]
struct Builder {
    /// Names of currently open elements
    open: Vec<String>,
    header: Option<Header>,
    root_closed: bool,
    records: Vec<Record>,
    commitments_seen: usize,
    pending: Option<Pending>,
    in_item: bool,
    field: Option<String>,
    text: String,
}

impl Builder {
    fn start(&mut self, e: &BytesStart<'_>) -> CommitmentResult<()> {
        let name = element_name(e);
        let depth = self.open.len();

        match depth {
            0 => {
                if self.root_closed {
                    return Err(malformed("multiple root elements"));
                }
                if name != "commitments" {
                    return Err(CommitmentError::Parse(
                        "Invalid XML structure - missing commitments element".into(),
                    ));
                }
                self.header = Some(header_from(&attributes(e)?));
            }
            1 if name == "commitment" => {
                self.commitments_seen += 1;
                self.pending = Some(Pending {
                    record: record_from(&attributes(e)?),
                    position: self.commitments_seen,
                    has_item: false,
                });
            }
            2 if name == "item" && self.under("commitment") => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.has_item = true;
                }
                self.in_item = true;
            }
            3 if self.in_item => {
                self.field = Some(name.clone());
                self.text.clear();
            }
            _ => {}
        }

        self.open.push(name);
        Ok(())
    }

    fn end(&mut self) -> CommitmentResult<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| malformed("unexpected closing tag"))?;
        let depth = self.open.len();

        match depth {
            0 => self.root_closed = true,
            1 if name == "commitment" => {
                if let Some(pending) = self.pending.take() {
                    if !pending.has_item {
                        return Err(CommitmentError::Parse(format!(
                            "Missing item element in commitment {}",
                            pending.position
                        )));
                    }
                    self.records.push(pending.record);
                }
            }
            2 if name == "item" => self.in_item = false,
            3 => {
                if let (Some(field), Some(pending)) = (self.field.take(), self.pending.as_mut()) {
                    set_item_field(&mut pending.record.item, &field, &self.text);
                }
                self.text.clear();
            }
            _ => {}
        }
        Ok(())
    }

    fn under(&self, parent: &str) -> bool {
        self.open.last().map(String::as_str) == Some(parent)
    }

    fn text(&mut self, text: &str) -> CommitmentResult<()> {
        if self.open.is_empty() {
            if !text.trim().is_empty() {
                return Err(malformed("text outside the root element"));
            }
        } else if self.field.is_some() {
            self.text.push_str(text);
        }
        Ok(())
    }

    fn finish(self) -> CommitmentResult<ParsedXml> {
        if let Some(name) = self.open.last() {
            return Err(malformed(format!("unclosed element <{}>", name)));
        }
        let header = self
            .header
            .ok_or_else(|| malformed("no root element"))?;
        Ok(ParsedXml {
            header,
            records: self.records,
        })
    }
}

/// Parse a commitments document
///
/// Every record gets a fresh id and creation time.
pub fn parse_xml(xml: &str) -> CommitmentResult<ParsedXml> {
    let mut reader = Reader::from_str(xml);
    let mut builder = Builder::default();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => builder.start(&e)?,
            Event::Empty(e) => {
                builder.start(&e)?;
                builder.end()?;
            }
            Event::End(_) => builder.end()?,
            Event::Text(t) => {
                let text = t.unescape().map_err(malformed)?;
                builder.text(&text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                builder.text(&text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish()
}
