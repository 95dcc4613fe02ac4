//! Domain error types
//!
//! This module defines the error hierarchy for docmodel.
//! All errors are domain-specific and don't expose driver or validator types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single schema violation reported by the validator
///
/// `code` is machine-readable (for example `INVALID_TYPE`), `path` is the dotted
/// path of the offending field (empty for the document root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// Machine-readable error code
    pub code: String,

    /// Dotted path of the failing field
    pub path: String,

    /// Human-readable description
    pub message: String,
}

impl ValidationDetail {
    /// Creates a new validation detail
    pub fn new(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{} at '{}': {}", self.code, self.path, self.message)
        }
    }
}

/// Main docmodel error type
///
/// Gate errors (`ValidationFailed`, `IdentifierUnresolved`) are produced before any
/// store call. Store errors are passed through from the document store.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Configuration-related errors (including out-of-order model setup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record failed schema validation
    #[error("Validation failed for {model}: {}", join_details(.details))]
    ValidationFailed {
        model: String,
        details: Vec<ValidationDetail>,
    },

    /// One or more `rids` paths did not resolve to a value
    #[error("Identifier unresolved for {model}: missing {}", .paths.join(", "))]
    IdentifierUnresolved { model: String, paths: Vec<String> },

    /// A single-record operation was called on a record without `_id`
    #[error("Record has no identifier: {0}")]
    MissingIdentifier(String),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ModelError {
    /// Detail entries attached to a gate rejection
    ///
    /// For `ValidationFailed` these are the validator's entries. For
    /// `IdentifierUnresolved` there is one `IDENTIFIER_UNRESOLVED` entry per path.
    pub fn details(&self) -> Vec<ValidationDetail> {
        match self {
            ModelError::ValidationFailed { details, .. } => details.clone(),
            ModelError::IdentifierUnresolved { paths, .. } => paths
                .iter()
                .map(|p| {
                    ValidationDetail::new("IDENTIFIER_UNRESOLVED", p.as_str(), "no value at path")
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the record was rejected by the gate (never reached the store)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ModelError::ValidationFailed { .. } | ModelError::IdentifierUnresolved { .. }
        )
    }

    /// Whether retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}

fn join_details(details: &[ValidationDetail]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Document store errors
///
/// Errors that occur when talking to the document store.
/// Messages carry the store's own wording; driver types stay inside the adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to insert document(s)
    #[error("Failed to insert document: {0}")]
    InsertFailed(String),

    /// Failed to update or replace a document
    #[error("Failed to update document: {0}")]
    UpdateFailed(String),

    /// Failed to delete document(s)
    #[error("Failed to delete document: {0}")]
    DeleteFailed(String),

    /// Failed to query documents
    #[error("Failed to query documents: {0}")]
    QueryFailed(String),

    /// Unique index violation on insert/upsert
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Write concern could not be satisfied (e.g. wtimeout expired)
    #[error("Write concern error: {0}")]
    WriteConcern(String),

    /// Document could not be converted to/from the store's format
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// In-memory store lock was poisoned
    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl StoreError {
    /// Connection and write-concern failures may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::ConnectionFailed(_) | StoreError::WriteConcern(_)
        )
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ModelError {
    fn from(err: toml::de::Error) -> Self {
        ModelError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ModelError::Configuration("schema must be set first".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: schema must be set first"
        );
    }

    #[test]
    fn test_validation_failed_display_lists_details() {
        let err = ModelError::ValidationFailed {
            model: "User".to_string(),
            details: vec![
                ValidationDetail::new("INVALID_TYPE", "person.age", "expected number"),
                ValidationDetail::new("OBJECT_MISSING_REQUIRED_PROPERTY", "", "name"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("User"));
        assert!(text.contains("INVALID_TYPE at 'person.age'"));
        assert!(text.contains("OBJECT_MISSING_REQUIRED_PROPERTY: name"));
    }

    #[test]
    fn test_identifier_unresolved_details() {
        let err = ModelError::IdentifierUnresolved {
            model: "User".to_string(),
            paths: vec!["name".to_string(), "age".to_string()],
        };
        let paths: Vec<String> = err.details().into_iter().map(|d| d.path).collect();
        assert_eq!(paths, vec!["name", "age"]);
        assert!(err.is_rejection());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::DuplicateKey("E11000".to_string());
        let err: ModelError = store_err.into();
        assert!(matches!(err, ModelError::Store(StoreError::DuplicateKey(_))));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_transient_store_errors_are_retryable() {
        let err: ModelError =
            StoreError::WriteConcern("waiting for replication timed out".into()).into();
        assert!(err.is_retryable());
        let err: ModelError = StoreError::DuplicateKey("dup".into()).into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ModelError = json_err.into();
        assert!(matches!(err, ModelError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ModelError = toml_err.into();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_model_error_implements_std_error() {
        let err = ModelError::MissingIdentifier("User".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
