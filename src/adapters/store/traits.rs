//! Document store abstraction traits
//!
//! This module defines the trait that document store adapters must implement.
//! A store handle is bound to exactly one collection.

use crate::domain::{
    DeleteOutcome, Document, InsertManyOutcome, InsertOneOutcome, Result, UpdateOutcome,
    WriteOptions,
};
use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;

/// Collection-bound document store
///
/// Every method performs a single round trip and returns the store's outcome
/// or error without reinterpretation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Downcast to Any for type-specific operations
    fn as_any(&self) -> &dyn Any;

    /// Name of the bound collection
    fn collection_name(&self) -> &str;

    /// Insert one document
    ///
    /// If the document has no `_id` the store generates one; the generated
    /// identifier is reported in the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including duplicate keys).
    async fn insert_one(&self, document: Document, options: &WriteOptions)
        -> Result<InsertOneOutcome>;

    /// Insert a batch of documents as one call, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the batch insert fails.
    async fn insert_many(
        &self,
        documents: Vec<Document>,
        options: &WriteOptions,
    ) -> Result<InsertManyOutcome>;

    /// Apply an update document (`$set`, `$unset`, ...) to the first match
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: &WriteOptions,
    ) -> Result<UpdateOutcome>;

    /// Replace the first matching document
    ///
    /// # Errors
    ///
    /// Returns an error if the replace fails.
    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
        options: &WriteOptions,
    ) -> Result<UpdateOutcome>;

    /// Delete the first matching document
    async fn delete_one(&self, filter: Document, options: &WriteOptions) -> Result<DeleteOutcome>;

    /// Delete every matching document
    async fn delete_many(&self, filter: Document, options: &WriteOptions)
        -> Result<DeleteOutcome>;

    /// All matching documents
    async fn find(&self, filter: Document) -> Result<Vec<Document>>;

    /// First matching document, optionally projected
    async fn find_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>>;

    /// Number of matching documents
    async fn count(&self, filter: Document) -> Result<u64>;

    /// Distinct values of a (dotted) field among matching documents
    async fn distinct(&self, field: &str, filter: Document) -> Result<Vec<Value>>;
}
