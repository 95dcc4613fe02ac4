//! Model type with collection-level operations

use super::config::ModelConfig;
use super::instance::Instance;
use crate::adapters::store::DocumentStore;
use crate::adapters::validation::SchemaValidator;
use crate::core::gate;
use crate::domain::{
    DeleteOutcome, Document, InsertManyOutcome, ModelError, ModelName, Record, Result,
    WriteOptions,
};
use serde_json::Value;
use std::sync::Arc;

/// A model type bound to its configuration
///
/// Cheap to clone; every clone shares the same [`ModelConfig`].
///
/// # Examples
///
/// ```
/// use docmodel::adapters::memory::MemoryStore;
/// use docmodel::adapters::validation::JsonSchemaValidator;
/// use docmodel::core::Model;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example() -> docmodel::domain::Result<()> {
/// let user = Model::builder("User")
///     .schema(json!({
///         "type": "object",
///         "metaSchema": {"rids": ["person.name", "person.age"]}
///     }))
///     .validator(Arc::new(JsonSchemaValidator::new()))
///     .store(Arc::new(MemoryStore::new("user")))
///     .build()?;
///
/// let mut fred = user.instance(json!({"person": {"name": "Fred", "age": 50}}))?;
/// fred.save(None).await?;
/// assert_eq!(fred.id(), Some(&json!("Fred::50")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    config: Arc<ModelConfig>,
}

impl Model {
    /// Wrap a finished configuration
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Start building a model named `name`
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    /// Model type name
    pub fn name(&self) -> &ModelName {
        self.config.name()
    }

    /// The shared configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Create an instance from a plain attribute object
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `attributes` is not a JSON object.
    pub fn instance(&self, attributes: Value) -> Result<Instance> {
        Ok(Instance::new(self.clone(), Record::from_value(attributes)?))
    }

    /// Create an instance around an existing record
    pub fn instance_from(&self, record: Record) -> Instance {
        Instance::new(self.clone(), record)
    }

    /// Run the validation gate over `record`
    ///
    /// # Errors
    ///
    /// See [`gate::prepare`].
    pub fn prepare(&self, record: &mut Record) -> Result<()> {
        gate::prepare(record, &self.config)
    }

    /// Count documents matching `filter` (all documents when `None`)
    pub async fn count(&self, filter: Option<Document>) -> Result<u64> {
        let store = self.store()?;
        crate::log_store_call!(self.name(), store.collection_name(), "count");
        store.count(filter.unwrap_or_default()).await
    }

    /// Distinct values at `field` among documents matching `filter`
    pub async fn distinct(&self, field: &str, filter: Option<Document>) -> Result<Vec<Value>> {
        let store = self.store()?;
        crate::log_store_call!(self.name(), store.collection_name(), "distinct");
        store.distinct(field, filter.unwrap_or_default()).await
    }

    /// Documents matching `filter` (all documents when `None`)
    pub async fn find(&self, filter: Option<Document>) -> Result<Vec<Record>> {
        let store = self.store()?;
        crate::log_store_call!(self.name(), store.collection_name(), "find");
        let documents = store.find(filter.unwrap_or_default()).await?;
        Ok(documents.into_iter().map(Record::from).collect())
    }

    /// Prepare every record, then insert them as one batch
    ///
    /// Records are prepared in input order and the first rejection is
    /// returned; nothing reaches the store unless every record passes.
    /// An empty batch returns an empty outcome without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns the first gate rejection, a configuration error, or the
    /// store's error.
    pub async fn insert_many(
        &self,
        records: Vec<Record>,
        options: Option<WriteOptions>,
    ) -> Result<InsertManyOutcome> {
        let store = self.store()?;

        // The driver refuses an empty insertMany
        if records.is_empty() {
            return Ok(InsertManyOutcome {
                inserted_count: 0,
                inserted_ids: Vec::new(),
                ops: Vec::new(),
            });
        }

        let mut documents = Vec::with_capacity(records.len());
        for (index, mut record) in records.into_iter().enumerate() {
            if let Err(error) = self.prepare(&mut record) {
                tracing::debug!(model = %self.name(), index, "Batch rejected");
                return Err(error);
            }
            documents.push(record.into_document());
        }

        crate::log_store_call!(
            self.name(),
            store.collection_name(),
            "insertMany",
            documents.len()
        );
        store
            .insert_many(documents, &self.write_options(options))
            .await
    }

    /// Delete every document matching `filter`
    pub async fn delete_many(
        &self,
        filter: Document,
        options: Option<WriteOptions>,
    ) -> Result<DeleteOutcome> {
        let store = self.store()?;
        crate::log_store_call!(self.name(), store.collection_name(), "deleteMany");
        store.delete_many(filter, &self.write_options(options)).await
    }

    pub(crate) fn store(&self) -> Result<&Arc<dyn DocumentStore>> {
        self.config.store()
    }

    pub(crate) fn write_options(&self, options: Option<WriteOptions>) -> WriteOptions {
        options
            .unwrap_or_default()
            .or_defaults(self.config.write_defaults())
    }
}

/// Builder applying configuration in schema, validator, store order
pub struct ModelBuilder {
    name: String,
    schema: Option<Value>,
    validator: Option<Arc<dyn SchemaValidator>>,
    store: Option<Arc<dyn DocumentStore>>,
    write_defaults: WriteOptions,
}

impl ModelBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            validator: None,
            store: None,
            write_defaults: WriteOptions::default(),
        }
    }

    /// Set the schema
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the validation engine
    pub fn validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Set the collection-bound store
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the default write concern
    pub fn write_defaults(mut self, defaults: WriteOptions) -> Self {
        self.write_defaults = defaults;
        self
    }

    /// Build the model
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name is empty, a validator or
    /// store is given without a schema, or the validator rejects the schema.
    pub fn build(self) -> Result<Model> {
        let name = ModelName::new(self.name).map_err(ModelError::Configuration)?;
        let mut config = ModelConfig::new(name);
        if let Some(schema) = self.schema {
            config.set_schema(schema)?;
        }
        if let Some(validator) = self.validator {
            config.set_validator(validator)?;
        }
        if let Some(store) = self.store {
            config.set_store(store)?;
        }
        config.set_write_defaults(self.write_defaults);
        Ok(Model::new(config))
    }
}
