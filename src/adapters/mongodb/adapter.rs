//! MongoDB adapter implementing the document store trait
//!
//! Every method is one driver call. Options are mapped onto the driver's
//! option types and outcomes are converted back into domain outcomes.

use super::convert::{
    map_error, to_bson_document, to_json, to_json_document, write_concern, StoreOp,
};
use crate::adapters::store::traits::DocumentStore;
use crate::domain::{
    DeleteOutcome, Document, InsertManyOutcome, InsertOneOutcome, Result, UpdateOutcome,
    WriteOptions, ID_FIELD,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::Document as BsonDocument;
use mongodb::options::{
    DeleteOptions, FindOneOptions, InsertManyOptions, InsertOneOptions, ReplaceOptions,
    UpdateOptions,
};
use mongodb::Collection;
use serde_json::Value;
use std::any::Any;

/// MongoDB implementation of [`DocumentStore`]
///
/// Wraps a driver collection handle; cloning it is cheap.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<BsonDocument>,
    name: String,
}

impl MongoStore {
    /// Create a store over a driver collection
    pub fn new(collection: Collection<BsonDocument>) -> Self {
        let name = collection.name().to_string();
        Self { collection, name }
    }

    /// Get a reference to the underlying driver collection
    pub fn collection(&self) -> &Collection<BsonDocument> {
        &self.collection
    }

    fn delete_options(options: &WriteOptions) -> DeleteOptions {
        let mut opts = DeleteOptions::default();
        opts.write_concern = write_concern(options);
        opts
    }
}

fn with_id(mut document: Document, id: &Value) -> Document {
    if !document.contains_key(ID_FIELD) {
        document.insert(ID_FIELD.to_string(), id.clone());
    }
    document
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn insert_one(
        &self,
        document: Document,
        options: &WriteOptions,
    ) -> Result<InsertOneOutcome> {
        let mut opts = InsertOneOptions::default();
        opts.write_concern = write_concern(options);
        opts.bypass_document_validation = options.bypass_document_validation;

        tracing::debug!(collection = %self.name, "insertOne");
        let bson_doc = to_bson_document(document.clone())?;
        let result = self
            .collection
            .insert_one(bson_doc, opts)
            .await
            .map_err(|e| map_error(e, StoreOp::Insert))?;

        let inserted_id = to_json(result.inserted_id);
        Ok(InsertOneOutcome {
            ops: vec![with_id(document, &inserted_id)],
            inserted_id,
            n: 1,
        })
    }

    async fn insert_many(
        &self,
        documents: Vec<Document>,
        options: &WriteOptions,
    ) -> Result<InsertManyOutcome> {
        let mut opts = InsertManyOptions::default();
        opts.write_concern = write_concern(options);
        opts.bypass_document_validation = options.bypass_document_validation;
        opts.ordered = Some(true);

        tracing::debug!(collection = %self.name, count = documents.len(), "insertMany");
        let bson_docs = documents
            .iter()
            .cloned()
            .map(to_bson_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut result = self
            .collection
            .insert_many(bson_docs, opts)
            .await
            .map_err(|e| map_error(e, StoreOp::Insert))?;

        let mut inserted_ids = Vec::with_capacity(documents.len());
        let mut ops = Vec::with_capacity(documents.len());
        for (index, document) in documents.into_iter().enumerate() {
            let id = result
                .inserted_ids
                .remove(&index)
                .map(to_json)
                .or_else(|| document.get(ID_FIELD).cloned())
                .unwrap_or(Value::Null);
            ops.push(with_id(document, &id));
            inserted_ids.push(id);
        }

        Ok(InsertManyOutcome {
            inserted_count: ops.len() as u64,
            inserted_ids,
            ops,
        })
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: &WriteOptions,
    ) -> Result<UpdateOutcome> {
        let mut opts = UpdateOptions::default();
        opts.write_concern = write_concern(options);
        opts.upsert = options.upsert;
        opts.bypass_document_validation = options.bypass_document_validation;

        tracing::debug!(collection = %self.name, upsert = ?options.upsert, "updateOne");
        let result = self
            .collection
            .update_one(
                to_bson_document(filter)?,
                to_bson_document(update.clone())?,
                opts,
            )
            .await
            .map_err(|e| map_error(e, StoreOp::Update))?;

        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.map(to_json),
            ops: vec![update],
        })
    }

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
        options: &WriteOptions,
    ) -> Result<UpdateOutcome> {
        let mut opts = ReplaceOptions::default();
        opts.write_concern = write_concern(options);
        opts.upsert = options.upsert;
        opts.bypass_document_validation = options.bypass_document_validation;

        tracing::debug!(collection = %self.name, upsert = ?options.upsert, "replaceOne");
        let result = self
            .collection
            .replace_one(
                to_bson_document(filter)?,
                to_bson_document(replacement.clone())?,
                opts,
            )
            .await
            .map_err(|e| map_error(e, StoreOp::Update))?;

        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.map(to_json),
            ops: vec![replacement],
        })
    }

    async fn delete_one(&self, filter: Document, options: &WriteOptions) -> Result<DeleteOutcome> {
        tracing::debug!(collection = %self.name, "deleteOne");
        let result = self
            .collection
            .delete_one(to_bson_document(filter)?, Self::delete_options(options))
            .await
            .map_err(|e| map_error(e, StoreOp::Delete))?;

        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }

    async fn delete_many(
        &self,
        filter: Document,
        options: &WriteOptions,
    ) -> Result<DeleteOutcome> {
        tracing::debug!(collection = %self.name, "deleteMany");
        let result = self
            .collection
            .delete_many(to_bson_document(filter)?, Self::delete_options(options))
            .await
            .map_err(|e| map_error(e, StoreOp::Delete))?;

        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>> {
        tracing::debug!(collection = %self.name, "find");
        let cursor = self
            .collection
            .find(to_bson_document(filter)?, None)
            .await
            .map_err(|e| map_error(e, StoreOp::Query))?;
        let raw: Vec<BsonDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| map_error(e, StoreOp::Query))?;

        let documents = raw
            .into_iter()
            .map(to_json_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(documents)
    }

    async fn find_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>> {
        let mut opts = FindOneOptions::default();
        if let Some(projection) = projection.filter(|p| !p.is_empty()) {
            opts.projection = Some(to_bson_document(projection)?);
        }

        tracing::debug!(collection = %self.name, "findOne");
        let found = self
            .collection
            .find_one(to_bson_document(filter)?, opts)
            .await
            .map_err(|e| map_error(e, StoreOp::Query))?;

        match found {
            Some(doc) => Ok(Some(to_json_document(doc)?)),
            None => Ok(None),
        }
    }

    async fn count(&self, filter: Document) -> Result<u64> {
        tracing::debug!(collection = %self.name, "countDocuments");
        let count = self
            .collection
            .count_documents(to_bson_document(filter)?, None)
            .await
            .map_err(|e| map_error(e, StoreOp::Query))?;
        Ok(count)
    }

    async fn distinct(&self, field: &str, filter: Document) -> Result<Vec<Value>> {
        tracing::debug!(collection = %self.name, field, "distinct");
        let values = self
            .collection
            .distinct(field, to_bson_document(filter)?, None)
            .await
            .map_err(|e| map_error(e, StoreOp::Query))?;
        Ok(values.into_iter().map(to_json).collect())
    }
}
