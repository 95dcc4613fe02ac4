//! Store operation outcomes
//!
//! Results returned by the document store, surfaced to callers as-is.

use super::record::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of inserting one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOneOutcome {
    /// Identifier of the inserted document
    pub inserted_id: Value,

    /// Number of documents written
    pub n: u64,

    /// Documents as written, including `_id`
    pub ops: Vec<Document>,
}

/// Result of a batch insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertManyOutcome {
    /// Number of documents written
    pub inserted_count: u64,

    /// Identifiers in input order
    pub inserted_ids: Vec<Value>,

    /// Documents as written, including `_id`
    pub ops: Vec<Document>,
}

/// Result of an update or replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Documents matched by the filter
    pub matched_count: u64,

    /// Documents actually changed
    pub modified_count: u64,

    /// Identifier of the inserted document when an upsert created one
    pub upserted_id: Option<Value>,

    /// The update or replacement document as sent to the store
    pub ops: Vec<Document>,
}

impl UpdateOutcome {
    /// True when the filter matched nothing and nothing was upserted
    pub fn is_noop(&self) -> bool {
        self.matched_count == 0 && self.upserted_id.is_none()
    }
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Documents removed
    pub deleted_count: u64,
}
