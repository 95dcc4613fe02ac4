//! Document store factory
//!
//! This module provides factory functions to create collection-bound stores
//! based on configuration.

use crate::adapters::memory::MemoryStore;
use crate::adapters::mongodb::MongoDbClient;
use crate::adapters::store::traits::DocumentStore;
use crate::config::schema::{DocModelConfig, StoreTarget};
use crate::domain::{CollectionName, ModelError, Result, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Source of collection-bound stores
///
/// One provider shares a single connection pool (MongoDB) or a single set of
/// collections (memory) across every model built from it.
#[derive(Clone)]
pub enum StoreProvider {
    /// Stores backed by one MongoDB client
    MongoDb(Arc<MongoDbClient>),
    /// In-memory collections keyed by name
    Memory(Arc<Mutex<HashMap<String, MemoryStore>>>),
}

impl StoreProvider {
    /// An empty in-memory provider
    pub fn memory() -> Self {
        StoreProvider::Memory(Arc::new(Mutex::new(HashMap::new())))
    }

    /// The backend this provider hands out
    pub fn target(&self) -> StoreTarget {
        match self {
            StoreProvider::MongoDb(_) => StoreTarget::MongoDb,
            StoreProvider::Memory(_) => StoreTarget::Memory,
        }
    }

    /// A store bound to `collection`
    ///
    /// The memory provider returns the same collection for repeated calls
    /// with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory provider's lock is poisoned.
    pub fn store(&self, collection: &CollectionName) -> Result<Arc<dyn DocumentStore>> {
        match self {
            StoreProvider::MongoDb(client) => {
                Ok(Arc::new(client.store(collection)) as Arc<dyn DocumentStore>)
            }
            StoreProvider::Memory(collections) => {
                let mut guard = collections
                    .lock()
                    .map_err(|_| StoreError::LockPoisoned("store provider"))?;
                let store = guard
                    .entry(collection.as_str().to_string())
                    .or_insert_with(|| MemoryStore::new(collection.as_str()))
                    .clone();
                Ok(Arc::new(store) as Arc<dyn DocumentStore>)
            }
        }
    }

    /// Verify the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the MongoDB ping fails.
    pub async fn test_connection(&self) -> Result<()> {
        match self {
            StoreProvider::MongoDb(client) => client.test_connection().await,
            StoreProvider::Memory(_) => Ok(()),
        }
    }
}

/// Create a store provider based on the configuration
///
/// This factory function examines `store_target` and the dry-run flag and
/// creates the matching provider. Dry runs always use the memory store.
///
/// # Errors
///
/// Returns an error if the MongoDB section is missing or the client cannot
/// be created.
pub async fn create_store_provider(config: &DocModelConfig) -> Result<StoreProvider> {
    if config.application.dry_run {
        tracing::info!("Dry run enabled, using in-memory store");
        return Ok(StoreProvider::memory());
    }

    match config.store_target {
        StoreTarget::MongoDb => {
            let mongo_config = config.mongodb.as_ref().ok_or_else(|| {
                ModelError::Configuration(
                    "mongodb configuration is required when store_target = 'mongodb'".to_string(),
                )
            })?;

            tracing::info!(database = %mongo_config.database_name, "Creating MongoDB client");
            let client = MongoDbClient::new(mongo_config.clone()).await?;

            Ok(StoreProvider::MongoDb(Arc::new(client)))
        }
        StoreTarget::Memory => {
            tracing::info!("Creating in-memory store");
            Ok(StoreProvider::memory())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::domain::WriteOptions;
    use serde_json::json;

    fn users() -> CollectionName {
        CollectionName::new("users").unwrap()
    }

    #[tokio::test]
    async fn test_memory_provider_shares_collections() {
        let provider = StoreProvider::memory();
        let first = provider.store(&users()).unwrap();
        let second = provider.store(&users()).unwrap();

        let doc = json!({"_id": "fred"}).as_object().cloned().unwrap();
        first.insert_one(doc, &WriteOptions::default()).await.unwrap();

        assert_eq!(second.count(Default::default()).await.unwrap(), 1);
        assert_eq!(second.collection_name(), "users");
    }

    #[tokio::test]
    async fn test_create_memory_provider_from_config() {
        let config = parse_config("store_target = \"memory\"\n").unwrap();
        let provider = create_store_provider(&config).await.unwrap();
        assert_eq!(provider.target(), StoreTarget::Memory);
        assert!(provider.test_connection().await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_forces_memory() {
        let config = parse_config(
            r#"
store_target = "mongodb"

[application]
dry_run = true

[mongodb]
uri = "mongodb://localhost:27017"
database_name = "wadofgum_db"
"#,
        )
        .unwrap();
        let provider = create_store_provider(&config).await.unwrap();
        assert_eq!(provider.target(), StoreTarget::Memory);
    }
}
