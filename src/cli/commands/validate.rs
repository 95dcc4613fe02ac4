//! Validate config command implementation
//!
//! This module implements the `validate-config` command: load the
//! configuration, compile every model schema and print a summary.

use crate::adapters::store::StoreProvider;
use crate::config::load_config;
use crate::config::schema::StoreTarget;
use crate::core::ModelRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Schemas are compiled against a memory store so no connection is made
        let registry = match ModelRegistry::with_provider(&config, StoreProvider::memory()) {
            Ok(r) => {
                println!("✅ All model schemas compiled");
                r
            }
            Err(e) => {
                println!("❌ Model configuration failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Store Target: {}", config.store_target);
        if config.store_target == StoreTarget::MongoDb {
            if let Some(ref mongo_config) = config.mongodb {
                println!("  MongoDB Database: {}", mongo_config.database_name);
                println!("  MongoDB App Name: {}", mongo_config.app_name);
            }
        }
        if let Some(ref w) = config.write.w {
            println!("  Write Concern w: {w:?}");
        }
        if let Some(ms) = config.write.wtimeout_ms {
            println!("  Write Concern wtimeout: {ms} ms");
        }
        println!("  Models: {}", registry.len());
        for model in registry.models() {
            let model_config = model.config();
            let collection = model_config
                .store()
                .map(|s| s.collection_name().to_string())
                .unwrap_or_default();
            if model_config.rids().is_empty() {
                println!("    - {} -> {}", model.name(), collection);
            } else {
                println!(
                    "    - {} -> {} (rids: {})",
                    model.name(),
                    collection,
                    model_config.rids().join(", ")
                );
            }
        }
        println!();
        Ok(0)
    }
}
