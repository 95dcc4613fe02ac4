//! Core model logic for docmodel.
//!
//! # Modules
//!
//! - [`gate`] - Identifier derivation and pre-persistence validation
//! - [`model`] - Model configuration, collection-level and record-level operations
//! - [`registry`] - Models built from configuration
//!
//! # Write Workflow
//!
//! 1. **Instantiate**: build an [`Instance`] from plain attributes
//! 2. **Derive**: compute `_id` from the model's `rids`, when configured
//! 3. **Validate**: check the record against the model's schema
//! 4. **Persist**: delegate to the model's document store
//!
//! A record rejected in steps 2 or 3 never reaches the store.
//!
//! # Example
//!
//! ```rust,no_run
//! use docmodel::config::load_config;
//! use docmodel::core::ModelRegistry;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("docmodel.toml")?;
//! let registry = ModelRegistry::from_config(&config).await?;
//!
//! let user = registry.get("User")?;
//! let mut fred = user.instance(json!({"person": {"name": "Fred", "age": 50}}))?;
//! let outcome = fred.save(None).await?;
//! println!("Inserted {}", outcome.inserted_id);
//! # Ok(())
//! # }
//! ```

pub mod gate;
pub mod model;
pub mod registry;

pub use model::{Instance, MetaSchema, Model, ModelBuilder, ModelConfig};
pub use registry::ModelRegistry;
