//! Dotted field paths over JSON documents
//!
//! Paths address nested object fields with `.` separators (`person.name`).
//! Array elements are addressed by numeric segments (`tags.0`).

use serde_json::{Map, Value};

/// Resolve a dotted path to the value stored there
///
/// Returns `None` when any segment is missing. A present `null` is returned as
/// `Some(&Value::Null)`; callers that treat null as missing use [`resolve_present`].
///
/// # Examples
///
/// ```
/// use docmodel::domain::path::resolve;
/// use serde_json::json;
///
/// let doc = json!({"person": {"name": "Fred"}});
/// assert_eq!(resolve(&doc, "person.name"), Some(&json!("Fred")));
/// assert_eq!(resolve(&doc, "person.age"), None);
/// ```
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    let (head, rest) = split_first(path);
    let child = match value {
        Value::Object(map) => map.get(head)?,
        Value::Array(items) => items.get(head.parse::<usize>().ok()?)?,
        _ => return None,
    };
    match rest {
        Some(rest) => resolve(child, rest),
        None => Some(child),
    }
}

/// Like [`resolve`], but a `null` leaf counts as unresolved
pub fn resolve_present<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    resolve(value, path).filter(|v| !v.is_null())
}

/// Resolve a dotted path inside an object map
pub fn resolve_in<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, rest) = split_first(path);
    let child = map.get(head)?;
    match rest {
        Some(rest) => resolve(child, rest),
        None => Some(child),
    }
}

/// Set the value at a dotted path, creating intermediate objects
///
/// Intermediate values that are not objects are replaced by empty objects.
pub fn set_in(map: &mut Map<String, Value>, path: &str, new_value: Value) {
    let (head, rest) = split_first(path);
    match rest {
        None => {
            map.insert(head.to_string(), new_value);
        }
        Some(rest) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child_map) = child {
                set_in(child_map, rest, new_value);
            }
        }
    }
}

/// Remove the value at a dotted path, returning it if present
pub fn remove_in(map: &mut Map<String, Value>, path: &str) -> Option<Value> {
    let (head, rest) = split_first(path);
    match rest {
        None => map.remove(head),
        Some(rest) => match map.get_mut(head)? {
            Value::Object(child) => remove_in(child, rest),
            _ => None,
        },
    }
}

fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}
