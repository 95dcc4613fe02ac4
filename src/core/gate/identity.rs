//! Record identifier derivation from `rids`
//!
//! A model whose metaSchema lists `rids` gets deterministic identifiers: the
//! values at those paths joined with `::`, in list order.

use crate::domain::path::resolve_present;
use crate::domain::Record;
use serde_json::Value;

/// Separator placed between resolved `rids` values
pub const RID_DELIMITER: &str = "::";

/// Outcome of identifier derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// No `rids` configured; the identifier is left to the caller or the store
    NotConfigured,
    /// Every path resolved; the joined identifier
    Derived(String),
    /// One or more paths were missing or null, in `rids` order
    Unresolved(Vec<String>),
}

/// Derive an identifier for `record` from `rids`
///
/// Strings contribute their text verbatim. Every other value contributes its
/// compact JSON text, so `50` becomes `50` and `true` becomes `true`.
///
/// # Examples
///
/// ```
/// use docmodel::core::gate::identity::{derive_identifier, Derivation};
/// use docmodel::domain::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(json!({"person": {"name": "Fred", "age": 50}})).unwrap();
/// let rids = vec!["person.name".to_string(), "person.age".to_string()];
/// assert_eq!(
///     derive_identifier(&record, &rids),
///     Derivation::Derived("Fred::50".to_string())
/// );
/// ```
pub fn derive_identifier(record: &Record, rids: &[String]) -> Derivation {
    if rids.is_empty() {
        return Derivation::NotConfigured;
    }

    let document = record.to_value();
    let mut segments = Vec::with_capacity(rids.len());
    let mut unresolved = Vec::new();

    for path in rids {
        match resolve_present(&document, path) {
            Some(value) => segments.push(segment_text(value)),
            None => unresolved.push(path.clone()),
        }
    }

    if unresolved.is_empty() {
        Derivation::Derived(segments.join(RID_DELIMITER))
    } else {
        Derivation::Unresolved(unresolved)
    }
}

fn segment_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
