//! Per-model configuration
//!
//! A [`ModelConfig`] binds a schema, its metaSchema, a validator and a store
//! handle to one model type. The schema comes first: a validator or store
//! cannot be attached to a model that has no schema.

use crate::adapters::store::DocumentStore;
use crate::adapters::validation::SchemaValidator;
use crate::domain::{ModelError, ModelName, Result, WriteOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Property of the schema that carries model metadata
pub const META_SCHEMA_KEY: &str = "metaSchema";

/// Model metadata carried alongside the schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaSchema {
    /// Ordered field paths whose values form the record identifier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rids: Vec<String>,
}

impl MetaSchema {
    /// Extract the metaSchema property from a schema document
    ///
    /// A schema without the property yields an empty metaSchema.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the property is present but malformed,
    /// including `rids` paths that are empty or contain an empty segment.
    pub fn from_schema(schema: &Value) -> Result<Self> {
        let meta: Self = match schema.get(META_SCHEMA_KEY) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(meta) => serde_json::from_value(meta.clone()).map_err(|e| {
                ModelError::Configuration(format!("Invalid {META_SCHEMA_KEY}: {e}"))
            })?,
        };

        if let Some(bad) = meta
            .rids
            .iter()
            .find(|path| path.split('.').any(|segment| segment.trim().is_empty()))
        {
            return Err(ModelError::Configuration(format!(
                "Invalid {META_SCHEMA_KEY}: rids path '{bad}' has an empty segment"
            )));
        }
        Ok(meta)
    }
}

/// Configuration bound to one model type
#[derive(Clone)]
pub struct ModelConfig {
    name: ModelName,
    schema: Option<Arc<Value>>,
    meta_schema: MetaSchema,
    validator: Option<Arc<dyn SchemaValidator>>,
    store: Option<Arc<dyn DocumentStore>>,
    write_defaults: WriteOptions,
}

impl ModelConfig {
    /// An empty configuration for `name`
    pub fn new(name: ModelName) -> Self {
        Self {
            name,
            schema: None,
            meta_schema: MetaSchema::default(),
            validator: None,
            store: None,
            write_defaults: WriteOptions::default(),
        }
    }

    /// Assign the schema and extract its metaSchema
    ///
    /// Re-assigning replaces the previous schema and metaSchema. When a
    /// validator is already attached it must accept the new schema.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the schema is not an object, its
    /// metaSchema is malformed, or the attached validator rejects it.
    pub fn set_schema(&mut self, schema: Value) -> Result<()> {
        if !schema.is_object() {
            return Err(ModelError::Configuration(format!(
                "Schema for {} must be a JSON object",
                self.name
            )));
        }
        let meta_schema = MetaSchema::from_schema(&schema)?;
        if let Some(validator) = &self.validator {
            validator.check_schema(&schema)?;
        }

        tracing::debug!(model = %self.name, rids = ?meta_schema.rids, "Schema assigned");
        self.schema = Some(Arc::new(schema));
        self.meta_schema = meta_schema;
        Ok(())
    }

    /// Attach the validation engine
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no schema is set yet or the validator
    /// rejects the schema.
    pub fn set_validator(&mut self, validator: Arc<dyn SchemaValidator>) -> Result<()> {
        let schema = self.require_schema("validator")?;
        validator.check_schema(schema)?;

        tracing::debug!(model = %self.name, validator = validator.name(), "Validator assigned");
        self.validator = Some(validator);
        Ok(())
    }

    /// Attach the collection-bound store
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no schema is set yet.
    pub fn set_store(&mut self, store: Arc<dyn DocumentStore>) -> Result<()> {
        self.require_schema("store")?;

        tracing::debug!(
            model = %self.name,
            collection = store.collection_name(),
            "Store assigned"
        );
        self.store = Some(store);
        Ok(())
    }

    /// Write concern applied when a call does not set its own
    pub fn set_write_defaults(&mut self, defaults: WriteOptions) {
        self.write_defaults = defaults;
    }

    /// Model type name
    pub fn name(&self) -> &ModelName {
        &self.name
    }

    /// The assigned schema, if any
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_deref()
    }

    /// The metaSchema extracted from the schema
    pub fn meta_schema(&self) -> &MetaSchema {
        &self.meta_schema
    }

    /// Identifier paths, empty when not configured
    pub fn rids(&self) -> &[String] {
        &self.meta_schema.rids
    }

    /// The attached validator, if any
    pub fn validator(&self) -> Option<&Arc<dyn SchemaValidator>> {
        self.validator.as_ref()
    }

    /// The attached store
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no store is attached.
    pub fn store(&self) -> Result<&Arc<dyn DocumentStore>> {
        self.store.as_ref().ok_or_else(|| {
            ModelError::Configuration(format!("store not configured for {}", self.name))
        })
    }

    /// Default write concern
    pub fn write_defaults(&self) -> &WriteOptions {
        &self.write_defaults
    }

    fn require_schema(&self, attaching: &str) -> Result<&Value> {
        self.schema().ok_or_else(|| {
            ModelError::Configuration(format!(
                "schema must be set on {} before assigning a {attaching}",
                self.name
            ))
        })
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("has_schema", &self.schema.is_some())
            .field("meta_schema", &self.meta_schema)
            .field("validator", &self.validator.as_ref().map(|v| v.name().to_string()))
            .field(
                "collection",
                &self.store.as_ref().map(|s| s.collection_name().to_string()),
            )
            .finish()
    }
}
