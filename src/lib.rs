//! commitments-cli - budget commitment records with XML import/export
//!
//! This library keeps per-user lists of budget commitments (invoices with an
//! attached budget classification item) under a shared header, validates them,
//! checks and repairs their sequence numbering, and exchanges them as an
//! attribute-based XML document.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (headers, records, users, activity)
//! - `xml`: XML generation, parsing and file verification
//! - `storage`: Local JSON, SQLite and mirrored persistence plus account files
//! - `services`: Validation, sequence integrity, auth, users, activity and the
//!   per-user records workspace
//! - `export`: CSV, JSON and YAML exports
//! - `fixtures`: Synthetic XML files for exercising the codec
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use commitments::models::{Header, Record};
//! use commitments::xml::{generate_xml, parse_xml};
//!
//! let xml = generate_xml(&Header::default(), &[Record::new()]);
//! let parsed = parse_xml(&xml)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod models;
pub mod services;
pub mod storage;
pub mod xml;

pub use error::{CommitmentError, CommitmentResult};
