//! Error types for recall.
//!
//! Every error carries the identifiers needed to act on it: the offending
//! field, the fixture file and line, or, for a missing mock, the call data and
//! fingerprint needed to author the fixture that would have matched.

use crate::fixture::FixtureEntry;
use crate::types::{Domain, Fingerprint};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for recall operations.
#[derive(Error, Debug)]
pub enum RecallError {
    // =========================================================================
    // Fingerprint Errors (E100-E199)
    // =========================================================================
    /// A structural field of a call has the wrong shape.
    #[error("E101: Invalid input for '{field}': expected {expected}")]
    InvalidInput {
        /// Dotted path of the offending field.
        field: String,
        /// The expected JSON shape.
        expected: &'static str,
    },

    // =========================================================================
    // Resolution Errors (E200-E299)
    // =========================================================================
    /// Strict mode was requested but no recorded outcome matched the call.
    #[error("E201: Missing automock for {target}")]
    MissingMock {
        /// Domain of the unmatched call.
        domain: Domain,
        /// Human-readable description of the call.
        target: String,
        /// The call data that failed to resolve, in fixture shape.
        call_data: Value,
        /// Fingerprint computed for the call.
        fingerprint: Fingerprint,
    },

    // =========================================================================
    // Fixture Loading Errors (E300-E399)
    // =========================================================================
    /// A fixture entry is malformed or its data cannot be fingerprinted.
    #[error("E301: Invalid mock data: {cause}")]
    InvalidMockData {
        /// Description of the problem.
        cause: String,
    },

    /// A fixture file line is not valid JSON.
    #[error("E302: JSON parse error {cause} {}:{line}", .path.display())]
    ParseError {
        /// The fixture file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Parser message.
        cause: String,
    },

    /// A fixture entry type has no registered domain.
    #[error("E303: Invalid mock data type - {mock_type}")]
    InvalidMockType {
        /// The unknown type name.
        mock_type: String,
    },

    // =========================================================================
    // Activation Errors (E400-E499)
    // =========================================================================
    /// Activation was given no collaborator to wrap.
    #[error("E401: No mockable libraries found")]
    NoMockableLibraries,

    // =========================================================================
    // Configuration Errors (E800-E899)
    // =========================================================================
    /// Invalid configuration.
    #[error("E801: Invalid configuration for '{field}': {cause}")]
    Config {
        /// The configuration key or file.
        field: String,
        /// Description of the problem.
        cause: String,
    },

    // =========================================================================
    // I/O Errors (E900-E999)
    // =========================================================================
    /// Filesystem I/O failed.
    #[error("E901: I/O error at {}: {cause}", .path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// Reason for the failure.
        cause: String,
    },
}

impl RecallError {
    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "E101",
            Self::MissingMock { .. } => "E201",
            Self::InvalidMockData { .. } => "E301",
            Self::ParseError { .. } => "E302",
            Self::InvalidMockType { .. } => "E303",
            Self::NoMockableLibraries => "E401",
            Self::Config { .. } => "E801",
            Self::Io { .. } => "E901",
        }
    }

    /// Check if this error was raised while loading fixtures.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMockData { .. } | Self::ParseError { .. } | Self::InvalidMockType { .. }
        )
    }

    /// Check if this is a strict-mode miss.
    #[must_use]
    pub fn is_missing_mock(&self) -> bool {
        matches!(self, Self::MissingMock { .. })
    }

    /// Turn a missing-mock error into a call fixture entry for its data.
    ///
    /// The entry still needs a call id and a matching outcome entry before it
    /// can resolve anything.
    #[must_use]
    pub fn to_fixture_entry(&self) -> Option<FixtureEntry> {
        match self {
            Self::MissingMock {
                domain, call_data, ..
            } => Some(FixtureEntry::new(domain.spec().call_kind, call_data.clone())),
            _ => None,
        }
    }

    pub(crate) fn invalid_input(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidInput {
            field: field.into(),
            expected,
        }
    }

    pub(crate) fn invalid_mock_data(cause: impl Into<String>) -> Self {
        Self::InvalidMockData {
            cause: cause.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            cause: err.to_string(),
        }
    }
}

/// Result type alias using `RecallError`.
pub type Result<T> = std::result::Result<T, RecallError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_codes_are_correct() {
        assert_eq!(RecallError::invalid_input("args", "object").code(), "E101");
        assert_eq!(RecallError::NoMockableLibraries.code(), "E401");
        assert_eq!(
            RecallError::InvalidMockType {
                mock_type: "FOO".to_string()
            }
            .code(),
            "E303"
        );
    }

    #[test]
    fn parse_error_names_file_and_line() {
        let err = RecallError::ParseError {
            path: PathBuf::from("fixtures/mock.jsonl"),
            line: 3,
            cause: "expected value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("E302"));
        assert!(msg.contains("fixtures/mock.jsonl:3"));
        assert!(err.is_load_error());
    }

    #[test]
    fn missing_mock_converts_to_fixture_entry() {
        let err = RecallError::MissingMock {
            domain: Domain::DbQuery,
            target: "query: SELECT 1".to_string(),
            call_data: json!({"query": "SELECT 1"}),
            fingerprint: Fingerprint::from_bytes([0; 16]),
        };
        assert!(err.is_missing_mock());
        assert!(err.to_string().contains("SELECT 1"));

        let entry = err.to_fixture_entry().unwrap();
        assert_eq!(entry.kind, "dbQuery");
        assert_eq!(entry.data["query"], "SELECT 1");
    }

    #[test]
    fn load_errors_are_classified() {
        assert!(RecallError::invalid_mock_data("bad").is_load_error());
        assert!(!RecallError::NoMockableLibraries.is_load_error());
    }
}
