//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod count;
pub mod import;
pub mod init;
pub mod validate;

use crate::domain::Record;
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

/// Read records from a JSON file holding one object or an array of objects
pub(crate) fn read_records(path: impl AsRef<Path>) -> anyhow::Result<Vec<Record>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Input file {} is not valid JSON", path.display()))?;

    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::from_value(item).with_context(|| format!("Input record {index}"))
        })
        .collect()
}
