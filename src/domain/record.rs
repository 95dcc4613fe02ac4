//! Record type
//!
//! A record is a JSON object of attributes. Nested fields are addressed with
//! dotted paths; the identifier lives in the top-level `_id` field.

use super::errors::ModelError;
use super::ids::ID_FIELD;
use super::path;
use super::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw JSON document as exchanged with the store
pub type Document = Map<String, Value>;

/// Attributes of a single model record
///
/// # Examples
///
/// ```
/// use docmodel::domain::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(json!({"person": {"name": "Fred"}})).unwrap();
/// assert_eq!(record.get("person.name"), Some(&json!("Fred")));
/// assert!(record.id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Document);

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self(Document::new())
    }

    /// Creates a record from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ModelError::Serialization(format!(
                "record must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// The record's `_id`, if set and not null
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD).filter(|v| !v.is_null())
    }

    /// Assigns the record's `_id`, returning the previous value
    pub fn set_id(&mut self, id: Value) -> Option<Value> {
        self.0.insert(ID_FIELD.to_string(), id)
    }

    /// Value at a dotted path
    pub fn get(&self, field_path: &str) -> Option<&Value> {
        path::resolve_in(&self.0, field_path)
    }

    /// Sets the value at a dotted path, creating intermediate objects
    pub fn set(&mut self, field_path: &str, value: Value) {
        path::set_in(&mut self.0, field_path, value);
    }

    /// Removes the value at a dotted path
    pub fn remove(&mut self, field_path: &str) -> Option<Value> {
        path::remove_in(&mut self.0, field_path)
    }

    /// Borrow the underlying document
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Consume the record, returning its document
    pub fn into_document(self) -> Document {
        self.0
    }

    /// A JSON value copy of the record
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Attributes without `_id`, as used by `$set` updates
    pub fn fields_without_id(&self) -> Document {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != ID_FIELD)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl From<Document> for Record {
    fn from(map: Document) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl TryFrom<Value> for Record {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// JSON type name used in error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_err());
        assert!(Record::from_value(json!("x")).is_err());
        assert!(Record::from_value(json!({})).is_ok());
    }

    #[test]
    fn test_id_ignores_null() {
        let record = Record::from_value(json!({"_id": null})).unwrap();
        assert!(record.id().is_none());
    }

    #[test]
    fn test_set_id_returns_previous() {
        let mut record = Record::from_value(json!({"_id": "a"})).unwrap();
        let previous = record.set_id(json!("b"));
        assert_eq!(previous, Some(json!("a")));
        assert_eq!(record.id(), Some(&json!("b")));
    }

    #[test]
    fn test_fields_without_id() {
        let record = Record::from_value(json!({"_id": "a", "person": {"name": "Ann"}})).unwrap();
        let fields = record.fields_without_id();
        assert!(!fields.contains_key("_id"));
        assert_eq!(fields.get("person"), Some(&json!({"name": "Ann"})));
    }

    #[test]
    fn test_transparent_serde() {
        let record = Record::from_value(json!({"a": 1})).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"a": 1}));
    }
}
