//! Display formatting for terminal output
//!
//! Every formatter returns a `String`; the CLI handlers print it.

pub mod record;
pub mod report;
pub mod user;

pub use record::{
    format_header, format_record_details, format_record_page, format_record_rows,
    format_validation_errors,
};
pub use report::{format_sequence_report, format_xml_comparison, format_xml_summary};
pub use user::{format_activity_list, format_dashboard, format_user_details, format_user_list};
