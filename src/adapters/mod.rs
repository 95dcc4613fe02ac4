//! External system integrations for docmodel.
//!
//! This module provides adapters for the two collaborators a model depends on:
//!
//! - [`store`] - Document store abstraction (trait-based) and factory
//! - [`mongodb`] - MongoDB implementation
//! - [`memory`] - In-process implementation for tests and dry runs
//! - [`validation`] - Schema validator abstraction and JSON Schema implementation
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing without a database server. Models only see the
//! [`store::DocumentStore`] and [`validation::SchemaValidator`] traits.
//!
//! ```rust
//! use docmodel::adapters::memory::MemoryStore;
//! use docmodel::adapters::store::DocumentStore;
//! use docmodel::domain::WriteOptions;
//! use serde_json::json;
//!
//! # async fn example() -> docmodel::domain::Result<()> {
//! let store = MemoryStore::new("users");
//! let doc = json!({"_id": "fred", "age": 50}).as_object().cloned().unwrap_or_default();
//! store.insert_one(doc, &WriteOptions::default()).await?;
//! assert_eq!(store.count(Default::default()).await?, 1);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod mongodb;
pub mod store;
pub mod validation;
