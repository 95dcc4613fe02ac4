//! Conversions between the domain's JSON documents and the driver's BSON
//!
//! JSON is converted through extended JSON, so an `{"$oid": "..."}` value
//! returned by the store round-trips back into an ObjectId.

use crate::domain::{Document, StoreError, WriteAck, WriteOptions};
use mongodb::bson::{self, Bson};
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use mongodb::options::{Acknowledgment, WriteConcern};
use serde_json::Value;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Kind of store operation, used to classify driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    Update,
    Delete,
    Query,
}

/// Convert a JSON document into a BSON document
pub fn to_bson_document(document: Document) -> Result<bson::Document, StoreError> {
    match Bson::try_from(Value::Object(document)) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(other) => Err(StoreError::Conversion(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
        Err(e) => Err(StoreError::Conversion(e.to_string())),
    }
}

/// Convert a BSON document into a JSON document (relaxed extended JSON)
pub fn to_json_document(document: bson::Document) -> Result<Document, StoreError> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Conversion(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Convert any BSON value into JSON (relaxed extended JSON)
pub fn to_json(value: Bson) -> Value {
    value.into_relaxed_extjson()
}

/// Driver write concern for the given options, if any was requested
pub fn write_concern(options: &WriteOptions) -> Option<WriteConcern> {
    if !options.has_write_concern() {
        return None;
    }
    let mut concern = WriteConcern::default();
    concern.w = options.w.as_ref().map(|ack| match ack {
        WriteAck::Nodes(n) => Acknowledgment::Nodes(*n),
        named if named.is_majority() => Acknowledgment::Majority,
        WriteAck::Named(tag) => Acknowledgment::Custom(tag.clone()),
    });
    concern.w_timeout = options.wtimeout_duration();
    Some(concern)
}

/// Classify a driver error, keeping the driver's message
pub fn map_error(err: DriverError, op: StoreOp) -> StoreError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StoreError::DuplicateKey(message)
        }
        ErrorKind::Write(WriteFailure::WriteConcernError(_)) => StoreError::WriteConcern(message),
        ErrorKind::BulkWrite(failure) if failure.write_concern_error.is_some() => {
            StoreError::WriteConcern(message)
        }
        ErrorKind::BulkWrite(failure)
            if failure
                .write_errors
                .as_ref()
                .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY_CODE)) =>
        {
            StoreError::DuplicateKey(message)
        }
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            StoreError::ConnectionFailed(message)
        }
        _ => match op {
            StoreOp::Insert => StoreError::InsertFailed(message),
            StoreOp::Update => StoreError::UpdateFailed(message),
            StoreOp::Delete => StoreError::DeleteFailed(message),
            StoreOp::Query => StoreError::QueryFailed(message),
        },
    }
}
