//! JSON Schema validator backed by the `jsonschema` crate
//!
//! Violations are reported with z-schema style codes (`INVALID_TYPE`,
//! `OBJECT_MISSING_REQUIRED_PROPERTY`, ...) so callers can branch on them.

use super::traits::SchemaValidator;
use crate::domain::{ModelError, Result, ValidationDetail};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{JSONSchema, ValidationError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Validator that compiles JSON Schemas once and caches them
#[derive(Default)]
pub struct JsonSchemaValidator {
    compiled: RwLock<HashMap<String, Arc<JSONSchema>>>,
}

impl JsonSchemaValidator {
    /// Create a validator with an empty schema cache
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, schema: &Value) -> Result<Arc<JSONSchema>> {
        let key = schema.to_string();
        if let Ok(cache) = self.compiled.read() {
            if let Some(hit) = cache.get(&key) {
                return Ok(Arc::clone(hit));
            }
        }

        let compiled = JSONSchema::options()
            .compile(schema)
            .map_err(|e| ModelError::Configuration(format!("Invalid JSON schema: {e}")))?;
        let compiled = Arc::new(compiled);

        if let Ok(mut cache) = self.compiled.write() {
            cache.insert(key, Arc::clone(&compiled));
        }
        tracing::debug!("Compiled JSON schema");
        Ok(compiled)
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn name(&self) -> &str {
        "jsonschema"
    }

    fn check_schema(&self, schema: &Value) -> Result<()> {
        if !schema.is_object() {
            return Err(ModelError::Configuration(
                "JSON schema must be an object".to_string(),
            ));
        }
        self.compile(schema).map(|_| ())
    }

    fn validate(&self, schema: &Value, document: &Value) -> Result<Vec<ValidationDetail>> {
        let compiled = self.compile(schema)?;
        let details = match compiled.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| to_detail(&e)).collect(),
        };
        Ok(details)
    }
}

fn to_detail(error: &ValidationError<'_>) -> ValidationDetail {
    let mut path = pointer_to_dotted(&error.instance_path.to_string());
    if let ValidationErrorKind::Required { property } = &error.kind {
        if let Some(name) = property.as_str() {
            path = if path.is_empty() {
                name.to_string()
            } else {
                format!("{path}.{name}")
            };
        }
    }
    ValidationDetail::new(error_code(&error.kind), path, error.to_string())
}

/// Map a validator error kind to its z-schema code
fn error_code(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Type { .. } => "INVALID_TYPE",
        ValidationErrorKind::Required { .. } => "OBJECT_MISSING_REQUIRED_PROPERTY",
        ValidationErrorKind::AdditionalProperties { .. } => "OBJECT_ADDITIONAL_PROPERTIES",
        ValidationErrorKind::Pattern { .. } => "PATTERN",
        ValidationErrorKind::Format { .. } => "INVALID_FORMAT",
        ValidationErrorKind::Enum { .. } | ValidationErrorKind::Constant { .. } => {
            "ENUM_MISMATCH"
        }
        ValidationErrorKind::Minimum { .. } | ValidationErrorKind::ExclusiveMinimum { .. } => {
            "MINIMUM"
        }
        ValidationErrorKind::Maximum { .. } | ValidationErrorKind::ExclusiveMaximum { .. } => {
            "MAXIMUM"
        }
        ValidationErrorKind::MinLength { .. } => "MIN_LENGTH",
        ValidationErrorKind::MaxLength { .. } => "MAX_LENGTH",
        ValidationErrorKind::MinItems { .. } => "ARRAY_LENGTH_SHORT",
        ValidationErrorKind::MaxItems { .. } => "ARRAY_LENGTH_LONG",
        ValidationErrorKind::MultipleOf { .. } => "MULTIPLE_OF",
        _ => "SCHEMA_VALIDATION_FAILED",
    }
}

/// `/person/age` -> `person.age`
fn pointer_to_dotted(pointer: &str) -> String {
    pointer
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "person": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "age": {"type": "number"}
                    },
                    "required": ["name", "age"]
                }
            },
            "required": ["person"]
        })
    }

    #[test]
    fn test_valid_document_has_no_details() {
        let validator = JsonSchemaValidator::new();
        let details = validator
            .validate(&person_schema(), &json!({"person": {"name": "Fred", "age": 50}}))
            .unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn test_null_number_is_invalid_type() {
        let validator = JsonSchemaValidator::new();
        let details = validator
            .validate(&person_schema(), &json!({"person": {"name": "Fred", "age": null}}))
            .unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].code, "INVALID_TYPE");
        assert_eq!(details[0].path, "person.age");
    }

    #[test]
    fn test_missing_required_property_path() {
        let validator = JsonSchemaValidator::new();
        let details = validator
            .validate(&person_schema(), &json!({"person": {"age": 3}}))
            .unwrap();
        assert_eq!(details[0].code, "OBJECT_MISSING_REQUIRED_PROPERTY");
        assert_eq!(details[0].path, "person.name");
    }

    #[test]
    fn test_empty_document_reports_root_requirement() {
        let validator = JsonSchemaValidator::new();
        let details = validator.validate(&person_schema(), &json!({})).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].path, "person");
    }

    #[test]
    fn test_check_schema_rejects_malformed_schema() {
        let validator = JsonSchemaValidator::new();
        assert!(validator.check_schema(&json!({"type": "not-a-type"})).is_err());
        assert!(validator.check_schema(&json!("not an object")).is_err());
        assert!(validator.check_schema(&person_schema()).is_ok());
    }

    #[test]
    fn test_pointer_to_dotted() {
        assert_eq!(pointer_to_dotted(""), "");
        assert_eq!(pointer_to_dotted("/person/age"), "person.age");
        assert_eq!(pointer_to_dotted("/a~1b/c"), "a/b.c");
    }
}
