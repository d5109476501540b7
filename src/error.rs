//! Custom error types for commitments-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::services::validation::ValidationError;

/// The main error type for commitments-cli operations
#[derive(Error, Debug)]
pub enum CommitmentError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// XML import errors (malformed document, missing elements)
    #[error("{0}")]
    Parse(String),

    /// The header or records failed validation and cannot be exported
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Bad input for a single operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Wrong credentials or an inactive account
    #[error("Invalid username or password")]
    LoginFailed,

    /// No session is active
    #[error("Not logged in. Run 'commitments login <username>' first")]
    NotLoggedIn,

    /// The active session lacks the required role
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// File-backed storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Relational storage errors
    #[error("Database error: {0}")]
    Database(String),
}

impl CommitmentError {
    /// Create a "not found" error for records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CommitmentError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CommitmentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for CommitmentError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for commitments-cli operations
pub type CommitmentResult<T> = Result<T, CommitmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommitmentError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = CommitmentError::record_not_found("rec-1234abcd");
        assert_eq!(err.to_string(), "Record not found: rec-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_error_shows_raw_message() {
        let err = CommitmentError::Parse("Missing item element in commitment 2".into());
        assert_eq!(err.to_string(), "Missing item element in commitment 2");
        assert!(err.is_parse());
    }

    #[test]
    fn test_validation_error_count() {
        let err = CommitmentError::Validation(vec![ValidationError::new(
            "treasury",
            "Treasury is required",
        )]);
        assert_eq!(err.to_string(), "Validation failed with 1 error(s)");
        assert_eq!(err.validation_errors().map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CommitmentError = io_err.into();
        assert!(matches!(err, CommitmentError::Io(_)));
    }
}
