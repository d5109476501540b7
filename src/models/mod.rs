//! Core data models for commitments-cli
//!
//! This module contains the data structures of the commitments domain:
//! headers, records with their budget items, users and activity entries.

pub mod activity;
pub mod bulk;
pub mod header;
pub mod ids;
pub mod record;
pub mod user;

pub use activity::MonthlyActivity;
pub use bulk::BulkEdit;
pub use header::{Header, HeaderPatch, DEFAULT_CURRENCY_CODE, DEFAULT_REASON_CODE};
pub use ids::{ActivityId, RecordId, UserId};
pub use record::{Record, RecordItem, RecordPatch};
pub use user::{Credentials, Session, User, UserRole, UserStatus, UserUpdate};
