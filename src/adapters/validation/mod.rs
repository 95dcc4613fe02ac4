//! Schema validation engines
//!
//! - [`SchemaValidator`] - the trait the gate validates through
//! - [`JsonSchemaValidator`] - JSON Schema implementation

pub mod json_schema;
pub mod traits;

pub use json_schema::JsonSchemaValidator;
pub use traits::SchemaValidator;
