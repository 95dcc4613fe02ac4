// docmodel - MongoDB persistence for schema-validated models
// Copyright (c) 2025 docmodel Contributors
// Licensed under the MIT License

//! # docmodel - MongoDB persistence for schema-validated models
//!
//! docmodel attaches MongoDB persistence to plain model types. Every write
//! passes through a gate first: an optional deterministic `_id` is derived
//! from the model's `rids` field paths, then the whole record is checked
//! against the model's JSON Schema. Records that fail either step never
//! reach the store.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Models, instances, the validation gate and the registry
//! - [`adapters`] - Document stores (MongoDB, in-memory) and schema validators
//! - [`domain`] - Records, options, outcomes and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docmodel::adapters::memory::MemoryStore;
//! use docmodel::adapters::validation::JsonSchemaValidator;
//! use docmodel::core::Model;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let user = Model::builder("User")
//!     .schema(json!({
//!         "type": "object",
//!         "metaSchema": {"rids": ["person.name", "person.age"]},
//!         "properties": {
//!             "person": {
//!                 "type": "object",
//!                 "properties": {
//!                     "name": {"type": "string"},
//!                     "age": {"type": "integer"}
//!                 }
//!             }
//!         }
//!     }))
//!     .validator(Arc::new(JsonSchemaValidator::new()))
//!     .store(Arc::new(MemoryStore::new("users")))
//!     .build()?;
//!
//! let mut fred = user.instance(json!({"person": {"name": "Fred", "age": 50}}))?;
//! let outcome = fred.save(None).await?;
//! assert_eq!(outcome.inserted_id, json!("Fred::50"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All library operations return [`domain::Result`]. Gate rejections carry
//! the individual problems:
//!
//! ```rust,no_run
//! use docmodel::domain::ModelError;
//!
//! fn report(error: &ModelError) {
//!     if error.is_rejection() {
//!         for detail in error.details() {
//!             eprintln!("{detail}");
//!         }
//!     }
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
