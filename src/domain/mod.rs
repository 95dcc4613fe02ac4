//! Domain models and types for docmodel.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records** ([`Record`]) and dotted field paths ([`path`])
//! - **Names** ([`ModelName`], [`CollectionName`])
//! - **Store options and outcomes** ([`WriteOptions`], [`InsertManyOutcome`], ...)
//! - **Error types** ([`ModelError`], [`StoreError`], [`ValidationDetail`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ModelError>`]:
//!
//! ```rust
//! use docmodel::domain::{ModelError, Record, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<Record> {
//!     // Non-object values are rejected
//!     let record = Record::from_value(json!({"person": {"name": "Fred"}}))?;
//!     Ok(record)
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod options;
pub mod outcome;
pub mod path;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ModelError, StoreError, ValidationDetail};
pub use ids::{CollectionName, ModelName, ID_FIELD};
pub use options::{WriteAck, WriteOptions};
pub use outcome::{DeleteOutcome, InsertManyOutcome, InsertOneOutcome, UpdateOutcome};
pub use record::{Document, Record};
pub use result::Result;
