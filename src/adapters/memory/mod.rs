//! In-memory document store
//!
//! This module provides a process-local store for tests, dry runs and local
//! development.

pub mod adapter;
pub mod filter;

pub use adapter::MemoryStore;
