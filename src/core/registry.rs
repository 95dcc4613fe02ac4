//! Model registry
//!
//! Builds every configured model from its schema file, a shared validator and
//! a store provider.

use crate::adapters::store::{create_store_provider, StoreProvider};
use crate::adapters::validation::{JsonSchemaValidator, SchemaValidator};
use crate::config::{DocModelConfig, ModelEntry};
use crate::core::model::Model;
use crate::domain::{CollectionName, ModelError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Models built from configuration, keyed by name
pub struct ModelRegistry {
    models: BTreeMap<String, Model>,
    provider: StoreProvider,
}

impl ModelRegistry {
    /// Connect to the configured store and build every model
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be created or any model fails to
    /// build.
    pub async fn from_config(config: &DocModelConfig) -> Result<Self> {
        let provider = create_store_provider(config).await?;
        Self::with_provider(config, provider)
    }

    /// Build every model against an existing provider
    ///
    /// # Errors
    ///
    /// Returns an error if a schema file cannot be read or parsed, or a model
    /// configuration is rejected.
    pub fn with_provider(config: &DocModelConfig, provider: StoreProvider) -> Result<Self> {
        let validator: Arc<dyn SchemaValidator> = Arc::new(JsonSchemaValidator::new());
        let defaults = config.write.to_write_options();

        let mut models = BTreeMap::new();
        for entry in &config.models {
            let schema = load_schema(&entry.schema_path)?;
            let collection = collection_for(entry)?;
            let model = Model::builder(entry.name.as_str())
                .schema(schema)
                .validator(Arc::clone(&validator))
                .store(provider.store(&collection)?)
                .write_defaults(defaults.clone())
                .build()?;

            tracing::info!(
                model = %entry.name,
                collection = %collection,
                rids = ?model.config().rids(),
                "Model registered"
            );
            models.insert(entry.name.clone(), model);
        }

        Ok(Self { models, provider })
    }

    /// Look up a model by name
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the known models if `name` is unknown.
    pub fn get(&self, name: &str) -> Result<&Model> {
        self.models.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.models.keys().map(String::as_str).collect();
            ModelError::Configuration(format!(
                "Unknown model '{}'. Configured models: {}",
                name,
                if known.is_empty() {
                    "(none)".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }

    /// Every registered model, ordered by name
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no models are registered
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The provider the models' stores came from
    pub fn provider(&self) -> &StoreProvider {
        &self.provider
    }
}

/// Read and parse a JSON Schema file
///
/// # Errors
///
/// Returns a configuration error if the file is missing or not valid JSON.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ModelError::Configuration(format!(
            "Failed to read schema file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        ModelError::Configuration(format!(
            "Failed to parse schema file {}: {}",
            path.display(),
            e
        ))
    })
}

fn collection_for(entry: &ModelEntry) -> Result<CollectionName> {
    CollectionName::new(entry.collection_name()).map_err(ModelError::Configuration)
}
