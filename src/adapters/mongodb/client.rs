//! MongoDB client implementation
//!
//! This module provides the connection to a MongoDB deployment and hands out
//! collection-bound stores.

use super::adapter::MongoStore;
use super::convert::{map_error, StoreOp};
use crate::config::MongoDbConfig;
use crate::domain::{CollectionName, ModelError, Result, StoreError};
use mongodb::bson::{doc, Document as BsonDocument};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

/// MongoDB client for docmodel
///
/// Holds the driver client (which owns the connection pool) and the
/// configured database.
pub struct MongoDbClient {
    /// Driver client
    client: Client,

    /// Configured database
    database: Database,

    /// Configuration
    config: MongoDbConfig,
}

impl MongoDbClient {
    /// Create a new MongoDB client
    ///
    /// Parses the connection URI and builds the driver client. The driver
    /// connects lazily; use [`MongoDbClient::test_connection`] to verify reachability.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI cannot be parsed or the client cannot be created.
    pub async fn new(config: MongoDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let uri: &str = config.uri.expose_secret().as_ref();
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            ModelError::Store(StoreError::ConnectionFailed(format!(
                "Failed to parse MongoDB URI: {e}"
            )))
        })?;
        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_seconds));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.connect_timeout_seconds));

        let client = Client::with_options(options).map_err(|e| {
            ModelError::Store(StoreError::ConnectionFailed(format!(
                "Failed to create MongoDB client: {e}"
            )))
        })?;
        let database = client.database(&config.database_name);

        tracing::info!(
            database = %config.database_name,
            app_name = %config.app_name,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Test the connection by pinging the database
    pub async fn test_connection(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| map_error(e, StoreOp::Query))?;

        tracing::debug!(database = %self.config.database_name, "MongoDB ping succeeded");
        Ok(())
    }

    /// Raw driver collection handle
    pub fn collection(&self, name: &CollectionName) -> Collection<BsonDocument> {
        self.database.collection::<BsonDocument>(name.as_str())
    }

    /// A store bound to one collection
    pub fn store(&self, name: &CollectionName) -> MongoStore {
        MongoStore::new(self.collection(name))
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// Close the client, waiting for in-flight operations to finish
    pub async fn shutdown(self) {
        tracing::info!(database = %self.config.database_name, "Shutting down MongoDB client");
        self.client.shutdown().await;
    }
}
