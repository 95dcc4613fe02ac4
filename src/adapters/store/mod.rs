//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction over collection operations,
//! allowing models to run against MongoDB or the in-memory store.

pub mod factory;
pub mod traits;

pub use factory::{create_store_provider, StoreProvider};
pub use traits::DocumentStore;
