//! Domain identifier types with validation
//!
//! Newtype wrappers for model and collection names, plus the `_id` field name
//! shared by every record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the identifier field on every record
pub const ID_FIELD: &str = "_id";

/// Model type name newtype wrapper
///
/// Identifies a model type (`User`, `Invoice`). Used in log fields and errors.
///
/// # Examples
///
/// ```
/// use docmodel::domain::ids::ModelName;
/// use std::str::FromStr;
///
/// let name = ModelName::from_str("User").unwrap();
/// assert_eq!(name.as_str(), "User");
/// assert_eq!(name.default_collection(), "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelName(String);

impl ModelName {
    /// Creates a new ModelName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ModelName)` if the name is non-empty, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        Ok(Self(name))
    }

    /// Returns the model name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Collection name used when none is configured: the lower-cased model name
    pub fn default_collection(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collection name newtype wrapper
///
/// MongoDB collection names may not be empty, contain `$` or a NUL byte, or
/// start with `system.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    /// Creates a new CollectionName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Collection name cannot be empty".to_string());
        }
        if name.contains('$') || name.contains('\0') {
            return Err(format!(
                "Collection name '{}' contains an illegal character",
                name
            ));
        }
        if name.starts_with("system.") {
            return Err(format!(
                "Collection name '{}' uses the reserved 'system.' prefix",
                name
            ));
        }
        Ok(Self(name))
    }

    /// Returns the collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
