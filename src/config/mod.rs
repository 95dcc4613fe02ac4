//! Configuration management for docmodel.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! docmodel uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DOCMODEL_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docmodel::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("docmodel.toml")?;
//!
//! println!("Store target: {}", config.store_target);
//! for model in &config.models {
//!     println!("{} -> {}", model.name, model.collection_name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! store_target = "mongodb"
//!
//! [mongodb]
//! uri = "${DOCMODEL_MONGODB_URI}"
//! database_name = "wadofgum_db"
//!
//! [write]
//! w = 1
//! wtimeout_ms = 5000
//!
//! [[models]]
//! name = "User"
//! schema_path = "schemas/user.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DocModelConfig, LoggingConfig, ModelEntry, MongoDbConfig, StoreTarget,
    WriteDefaults,
};
pub use secret::{secret_string, SecretString, SecretValue};
