//! Model composition
//!
//! A model type is plain data plus a [`ModelConfig`]. [`Model`] carries the
//! collection-level operations and hands out [`Instance`]s for record-level
//! ones.

pub mod config;
pub mod definition;
pub mod instance;

pub use config::{MetaSchema, ModelConfig, META_SCHEMA_KEY};
pub use definition::{Model, ModelBuilder};
pub use instance::Instance;
