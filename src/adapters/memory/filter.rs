//! Query, projection and update evaluation for the in-memory store
//!
//! Supports the subset of the MongoDB query language the model layer emits:
//! - filters: dotted-path equality, `$eq`, `$ne`, `$in`, `$nin`, `$exists`,
//!   `$gt`, `$gte`, `$lt`, `$lte`, and top-level `$and` / `$or`
//! - updates: `$set`, `$unset`, `$inc`
//! - projections: pure inclusion or pure exclusion

use crate::domain::path::{remove_in, resolve_in, set_in};
use crate::domain::{Document, StoreError, ID_FIELD};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Does `doc` satisfy `filter`?
pub fn matches(doc: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (key, condition) in filter {
        let ok = match key.as_str() {
            "$and" => all_clauses(doc, condition)?.iter().all(|m| *m),
            "$or" => all_clauses(doc, condition)?.iter().any(|m| *m),
            op if op.starts_with('$') => {
                return Err(StoreError::QueryFailed(format!(
                    "unsupported top-level operator {op}"
                )))
            }
            field => field_matches(resolve_in(doc, field), condition)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn all_clauses(doc: &Document, clauses: &Value) -> Result<Vec<bool>, StoreError> {
    let items = clauses
        .as_array()
        .ok_or_else(|| StoreError::QueryFailed("$and/$or expects an array".to_string()))?;
    items
        .iter()
        .map(|clause| match clause {
            Value::Object(sub) => matches(doc, sub),
            _ => Err(StoreError::QueryFailed(
                "$and/$or clauses must be objects".to_string(),
            )),
        })
        .collect()
}

fn field_matches(actual: Option<&Value>, condition: &Value) -> Result<bool, StoreError> {
    match condition {
        Value::Object(ops) if is_operator_object(ops) => {
            for (op, operand) in ops {
                if !operator_matches(actual, op, operand)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        expected => Ok(equals(actual, expected)),
    }
}

fn is_operator_object(map: &Document) -> bool {
    !map.is_empty() && map.keys().all(|k| k.starts_with('$'))
}

fn operator_matches(actual: Option<&Value>, op: &str, operand: &Value) -> Result<bool, StoreError> {
    let result = match op {
        "$eq" => equals(actual, operand),
        "$ne" => !equals(actual, operand),
        "$in" => in_list(actual, operand)?,
        "$nin" => !in_list(actual, operand)?,
        "$exists" => actual.is_some() == is_truthy(operand),
        "$gt" => compare(actual, operand) == Some(Ordering::Greater),
        "$gte" => matches!(
            compare(actual, operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        "$lt" => compare(actual, operand) == Some(Ordering::Less),
        "$lte" => matches!(
            compare(actual, operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        other => {
            return Err(StoreError::QueryFailed(format!(
                "unsupported query operator {other}"
            )))
        }
    };
    Ok(result)
}

fn in_list(actual: Option<&Value>, operand: &Value) -> Result<bool, StoreError> {
    let options = operand
        .as_array()
        .ok_or_else(|| StoreError::QueryFailed("$in/$nin expects an array".to_string()))?;
    Ok(options.iter().any(|candidate| equals(actual, candidate)))
}

/// Equality with MongoDB's conventions: `null` matches missing fields and an
/// array field matches any of its elements.
fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(value) => {
            values_equal(value, expected)
                || matches!(
                    value,
                    Value::Array(items) if items.iter().any(|i| values_equal(i, expected))
                )
        }
    }
}

/// Value equality that treats `50` and `50.0` as the same number
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, xv)| ym.get(k).is_some_and(|yv| values_equal(xv, yv)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    x == y || matches!((x.as_f64(), y.as_f64()), (Some(a), Some(b)) if a == b)
}

fn compare(actual: Option<&Value>, operand: &Value) -> Option<Ordering> {
    match (actual?, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null => false,
        _ => true,
    }
}

/// Apply a projection map to a document
///
/// `_id` is kept unless explicitly excluded. Mixing inclusion and exclusion of
/// non-`_id` fields is rejected, as the server does.
pub fn project(doc: &Document, projection: &Document) -> Result<Document, StoreError> {
    let includes: Vec<&String> = projection
        .iter()
        .filter(|(k, v)| k.as_str() != ID_FIELD && is_truthy(v))
        .map(|(k, _)| k)
        .collect();
    let excludes: Vec<&String> = projection
        .iter()
        .filter(|(k, v)| k.as_str() != ID_FIELD && !is_truthy(v))
        .map(|(k, _)| k)
        .collect();
    if !includes.is_empty() && !excludes.is_empty() {
        return Err(StoreError::QueryFailed(
            "projection cannot mix inclusion and exclusion".to_string(),
        ));
    }
    let keep_id = projection.get(ID_FIELD).map(is_truthy).unwrap_or(true);

    let mut out = if includes.is_empty() {
        let mut out = doc.clone();
        for path in excludes {
            remove_in(&mut out, path);
        }
        out
    } else {
        let mut out = Document::new();
        if let Some(id) = doc.get(ID_FIELD) {
            out.insert(ID_FIELD.to_string(), id.clone());
        }
        for path in includes {
            if let Some(value) = resolve_in(doc, path) {
                set_in(&mut out, path, value.clone());
            }
        }
        out
    };
    if !keep_id {
        out.remove(ID_FIELD);
    }
    Ok(out)
}

/// Apply an update document in place, returning whether anything changed
pub fn apply_update(doc: &mut Document, update: &Document) -> Result<bool, StoreError> {
    if update.is_empty() || !update.keys().all(|k| k.starts_with('$')) {
        return Err(StoreError::UpdateFailed(
            "update document requires atomic operators".to_string(),
        ));
    }
    let mut changed = false;
    for (op, fields) in update {
        let fields = fields.as_object().ok_or_else(|| {
            StoreError::UpdateFailed(format!("{op} expects an object of fields"))
        })?;
        for (path, value) in fields {
            if path == ID_FIELD && op != "$set" {
                return Err(StoreError::UpdateFailed(format!(
                    "{op} cannot modify the _id field"
                )));
            }
            changed |= match op.as_str() {
                "$set" => {
                    if path == ID_FIELD {
                        match doc.get(ID_FIELD) {
                            Some(existing) if !values_equal(existing, value) => {
                                return Err(StoreError::UpdateFailed(
                                    "the _id field cannot be changed".to_string(),
                                ))
                            }
                            _ => {}
                        }
                    }
                    let unchanged =
                        resolve_in(doc, path).is_some_and(|old| values_equal(old, value));
                    if !unchanged {
                        set_in(doc, path, value.clone());
                    }
                    !unchanged
                }
                "$unset" => remove_in(doc, path).is_some(),
                "$inc" => increment(doc, path, value)?,
                other => {
                    return Err(StoreError::UpdateFailed(format!(
                        "unsupported update operator {other}"
                    )))
                }
            };
        }
    }
    Ok(changed)
}

fn increment(doc: &mut Document, path: &str, by: &Value) -> Result<bool, StoreError> {
    let by = by
        .as_f64()
        .ok_or_else(|| StoreError::UpdateFailed("$inc expects a number".to_string()))?;
    let current = match resolve_in(doc, path) {
        None => 0.0,
        Some(v) => v.as_f64().ok_or_else(|| {
            StoreError::UpdateFailed(format!("cannot $inc non-numeric field {path}"))
        })?,
    };
    let total = current + by;
    let value = if total.fract() == 0.0 && total.abs() < i64::MAX as f64 {
        Value::from(total as i64)
    } else {
        Number::from_f64(total).map(Value::Number).ok_or_else(|| {
            StoreError::UpdateFailed(format!("$inc produced a non-finite value at {path}"))
        })?
    };
    set_in(doc, path, value);
    Ok(by != 0.0)
}

/// Plain equality fields of a filter, used to seed an upserted document
pub fn seed_from_filter(filter: &Document) -> Document {
    let mut seed = Document::new();
    for (key, condition) in filter {
        if key.starts_with('$') {
            continue;
        }
        match condition {
            Value::Object(ops) if is_operator_object(ops) => {
                if let Some(eq) = ops.get("$eq") {
                    set_in(&mut seed, key, eq.clone());
                }
            }
            value => set_in(&mut seed, key, value.clone()),
        }
    }
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches(&doc(json!({"a": 1})), &Document::new()).unwrap());
    }

    #[test]
    fn test_dotted_equality() {
        let d = doc(json!({"person": {"name": "John", "age": 50}}));
        assert!(matches(&d, &doc(json!({"person.name": "John"}))).unwrap());
        assert!(!matches(&d, &doc(json!({"person.name": "Frank"}))).unwrap());
        assert!(matches(&d, &doc(json!({"person.age": 50.0}))).unwrap());
    }

    #[test]
    fn test_null_matches_missing() {
        let d = doc(json!({"a": 1}));
        assert!(matches(&d, &doc(json!({"b": null}))).unwrap());
    }

    #[test]
    fn test_operators() {
        let d = doc(json!({"age": 35, "tags": ["x", "y"]}));
        assert!(matches(&d, &doc(json!({"age": {"$gte": 35, "$lt": 40}}))).unwrap());
        assert!(matches(&d, &doc(json!({"age": {"$in": [1, 35]}}))).unwrap());
        assert!(matches(&d, &doc(json!({"age": {"$ne": 36}}))).unwrap());
        assert!(matches(&d, &doc(json!({"name": {"$exists": false}}))).unwrap());
        assert!(matches(&d, &doc(json!({"tags": "y"}))).unwrap());
        assert!(matches(&d, &doc(json!({"$or": [{"age": 1}, {"age": 35}]}))).unwrap());
    }

    #[test]
    fn test_exists_operand_is_truthy() {
        let d = doc(json!({"a": 1}));
        assert!(matches(&d, &doc(json!({"x": {"$exists": 0}}))).unwrap());
        assert!(matches(&d, &doc(json!({"x": {"$exists": null}}))).unwrap());
        assert!(!matches(&d, &doc(json!({"a": {"$exists": 0}}))).unwrap());
        assert!(matches(&d, &doc(json!({"a": {"$exists": 1}}))).unwrap());
        assert!(matches(&d, &doc(json!({"a": {"$exists": "yes"}}))).unwrap());
    }

    #[test]
    fn test_unknown_operator_is_an_error() {
        let d = doc(json!({"age": 35}));
        assert!(matches(&d, &doc(json!({"age": {"$regex": "3"}}))).is_err());
    }

    #[test]
    fn test_projection_exclusion() {
        let d = doc(json!({"_id": "1", "person": {"name": "John", "age": 50}}));
        let projected = project(&d, &doc(json!({"person.name": 0}))).unwrap();
        assert_eq!(Value::Object(projected), json!({"_id": "1", "person": {"age": 50}}));
    }

    #[test]
    fn test_projection_inclusion() {
        let d = doc(json!({"_id": "1", "person": {"name": "John", "age": 50}}));
        let projected = project(&d, &doc(json!({"person.age": 1, "_id": 0}))).unwrap();
        assert_eq!(Value::Object(projected), json!({"person": {"age": 50}}));
    }

    #[test]
    fn test_projection_rejects_mixed_modes() {
        let d = doc(json!({"a": 1, "b": 2}));
        assert!(project(&d, &doc(json!({"a": 1, "b": 0}))).is_err());
    }

    #[test]
    fn test_apply_set_reports_changes() {
        let mut d = doc(json!({"_id": "1", "person": {"age": 35}}));
        let changed = apply_update(&mut d, &doc(json!({"$set": {"person.age": 35}}))).unwrap();
        assert!(!changed);
        let changed = apply_update(&mut d, &doc(json!({"$set": {"person.age": 36}}))).unwrap();
        assert!(changed);
        assert_eq!(d["person"]["age"], json!(36));
    }

    #[test]
    fn test_apply_update_requires_operators() {
        let mut d = doc(json!({"a": 1}));
        assert!(apply_update(&mut d, &doc(json!({"a": 2}))).is_err());
    }

    #[test]
    fn test_apply_set_cannot_change_id() {
        let mut d = doc(json!({"_id": "1"}));
        assert!(apply_update(&mut d, &doc(json!({"$set": {"_id": "2"}}))).is_err());
    }

    #[test]
    fn test_apply_inc_and_unset() {
        let mut d = doc(json!({"n": 1, "gone": true}));
        apply_update(&mut d, &doc(json!({"$inc": {"n": 2}, "$unset": {"gone": ""}}))).unwrap();
        assert_eq!(Value::Object(d), json!({"n": 3}));
    }

    #[test]
    fn test_seed_from_filter() {
        let seed = seed_from_filter(&doc(json!({"_id": "x", "age": {"$gt": 3}, "k": {"$eq": 1}})));
        assert_eq!(Value::Object(seed), json!({"_id": "x", "k": 1}));
    }
}
