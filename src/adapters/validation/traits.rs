//! Schema validator abstraction
//!
//! The gate only needs two things from a validation engine: a way to reject an
//! unusable schema up front, and a list of violations for a candidate document.

use crate::domain::{Result, ValidationDetail};
use serde_json::Value;

/// Validation engine for model schemas
pub trait SchemaValidator: Send + Sync {
    /// Short engine name for logs
    fn name(&self) -> &str;

    /// Check that `schema` can be used for validation
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the schema is malformed.
    fn check_schema(&self, schema: &Value) -> Result<()>;

    /// Validate `document` against `schema`
    ///
    /// Returns every violation found; an empty list means the document is valid.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the schema cannot be compiled.
    fn validate(&self, schema: &Value, document: &Value) -> Result<Vec<ValidationDetail>>;
}
