//! Model instance with record-level operations
//!
//! Single-record operations address the stored document by the record's
//! current `_id`. Only `save` runs the validation gate.

use super::definition::Model;
use crate::domain::{
    DeleteOutcome, Document, InsertOneOutcome, ModelError, Record, Result, UpdateOutcome,
    WriteOptions, ID_FIELD,
};
use serde_json::Value;

/// One record of a model
#[derive(Debug, Clone)]
pub struct Instance {
    model: Model,
    record: Record,
}

impl Instance {
    pub(crate) fn new(model: Model, record: Record) -> Self {
        Self { model, record }
    }

    /// The model this instance belongs to
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The instance's attributes
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Mutable access to the instance's attributes
    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    /// Consume the instance, returning its record
    pub fn into_record(self) -> Record {
        self.record
    }

    /// The record's `_id`, if set
    pub fn id(&self) -> Option<&Value> {
        self.record.id()
    }

    /// Run the validation gate over this instance's record
    ///
    /// # Errors
    ///
    /// See [`crate::core::gate::prepare`].
    pub fn prepare(&mut self) -> Result<()> {
        self.model.prepare(&mut self.record)
    }

    /// Prepare the record, then insert it
    ///
    /// When the record has no `_id` after preparation, the identifier the
    /// store generates is written back onto the instance.
    ///
    /// # Errors
    ///
    /// Returns a gate rejection, a configuration error, or the store's error.
    /// The store is not contacted when preparation fails.
    pub async fn save(&mut self, options: Option<WriteOptions>) -> Result<InsertOneOutcome> {
        let store = self.model.store()?;
        self.model.prepare(&mut self.record)?;

        crate::log_store_call!(self.model.name(), store.collection_name(), "insertOne");
        let outcome = store
            .insert_one(
                self.record.as_document().clone(),
                &self.model.write_options(options),
            )
            .await?;

        if self.record.id().is_none() {
            self.record.set_id(outcome.inserted_id.clone());
        }
        Ok(outcome)
    }

    /// Fetch the stored document with this instance's `_id`
    ///
    /// `projection` is passed to the store unchanged.
    pub async fn find_one(&self, projection: Option<Document>) -> Result<Option<Record>> {
        let store = self.model.store()?;
        let filter = self.id_filter()?;

        crate::log_store_call!(self.model.name(), store.collection_name(), "findOne");
        let found = store.find_one(filter, projection).await?;
        Ok(found.map(Record::from))
    }

    /// `$set` this instance's attributes on the stored document
    ///
    /// The record is not re-validated.
    pub async fn update_one(&self, options: Option<WriteOptions>) -> Result<UpdateOutcome> {
        let store = self.model.store()?;
        let filter = self.id_filter()?;
        let mut update = Document::new();
        update.insert(
            "$set".to_string(),
            Value::Object(self.record.fields_without_id()),
        );

        crate::log_store_call!(self.model.name(), store.collection_name(), "updateOne");
        store
            .update_one(filter, update, &self.model.write_options(options))
            .await
    }

    /// Replace the stored document with this instance's attributes
    ///
    /// The record is not re-validated. A missing document is reported by the
    /// store as zero matches.
    pub async fn replace_one(&self, options: Option<WriteOptions>) -> Result<UpdateOutcome> {
        let store = self.model.store()?;
        let filter = self.id_filter()?;

        crate::log_store_call!(self.model.name(), store.collection_name(), "replaceOne");
        store
            .replace_one(
                filter,
                self.record.as_document().clone(),
                &self.model.write_options(options),
            )
            .await
    }

    /// Delete the stored document with this instance's `_id`
    pub async fn delete_one(&self, options: Option<WriteOptions>) -> Result<DeleteOutcome> {
        let store = self.model.store()?;
        let filter = self.id_filter()?;

        crate::log_store_call!(self.model.name(), store.collection_name(), "deleteOne");
        store
            .delete_one(filter, &self.model.write_options(options))
            .await
    }

    fn id_filter(&self) -> Result<Document> {
        let id = self
            .record
            .id()
            .ok_or_else(|| ModelError::MissingIdentifier(self.model.name().to_string()))?;
        let mut filter = Document::new();
        filter.insert(ID_FIELD.to_string(), id.clone());
        Ok(filter)
    }
}
