//! XML codec for the commitments wire format
//!
//! Attribute-based document with a `<commitments>` root carrying the header
//! and one `<commitment>` per record, each holding an `<item>` element.

pub mod reader;
pub mod verify;
pub mod writer;

use chrono::NaiveDate;

use crate::models::{Header, Record};

pub use reader::parse_xml;
pub use verify::{compare, summarize, SequenceMismatch, XmlComparison, XmlSummary};
pub use writer::{computed_external_id, generate_xml};

/// Header and records read from a document
#[derive(Debug, Clone)]
pub struct ParsedXml {
    pub header: Header,
    pub records: Vec<Record>,
}

/// `commitments_<YYYY-MM-DD>.xml`
pub fn export_filename(date: NaiveDate) -> String {
    format!("commitments_{}.xml", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename(date), "commitments_2025-03-07.xml");
    }
}
