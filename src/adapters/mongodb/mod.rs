//! MongoDB document store
//!
//! [`MongoDbClient`] owns the driver connection pool; [`MongoStore`] is a
//! handle bound to one collection.

pub mod adapter;
pub mod client;
pub mod convert;

pub use adapter::MongoStore;
pub use client::MongoDbClient;
