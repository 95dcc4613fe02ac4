//! Pre-persistence preparation of a record

use super::identity::{derive_identifier, Derivation};
use crate::core::model::ModelConfig;
use crate::domain::{ModelError, Record, Result};
use serde_json::Value;

/// Prepare `record` for a write on the model described by `config`
///
/// Runs identifier derivation first. When `rids` are configured and resolve,
/// the joined identifier overwrites `_id`; when any path is missing the record
/// is rejected with [`ModelError::IdentifierUnresolved`] and schema validation
/// is skipped. The record is then validated against the model's schema and
/// rejected with [`ModelError::ValidationFailed`] on any violation.
///
/// The only side effect is the `_id` assignment. Preparing an already
/// prepared record yields the same identifier.
///
/// # Errors
///
/// Returns a configuration error if the model has no schema or validator,
/// otherwise one of the two gate rejections above.
pub fn prepare(record: &mut Record, config: &ModelConfig) -> Result<()> {
    let model = config.name();
    let schema = config.schema().ok_or_else(|| {
        ModelError::Configuration(format!("schema not configured for {model}"))
    })?;
    let validator = config.validator().ok_or_else(|| {
        ModelError::Configuration(format!("validator not configured for {model}"))
    })?;

    match derive_identifier(record, config.rids()) {
        Derivation::NotConfigured => {}
        Derivation::Derived(id) => {
            tracing::debug!(model = %model, id = %id, "Derived record identifier");
            record.set_id(Value::String(id));
        }
        Derivation::Unresolved(paths) => {
            let error = ModelError::IdentifierUnresolved {
                model: model.to_string(),
                paths,
            };
            crate::log_gate_rejection!(model, &error);
            return Err(error);
        }
    }

    let details = validator.validate(schema, &record.to_value())?;
    if !details.is_empty() {
        let error = ModelError::ValidationFailed {
            model: model.to_string(),
            details,
        };
        crate::log_gate_rejection!(model, &error);
        return Err(error);
    }

    tracing::debug!(model = %model, id = ?record.id(), "Record passed validation");
    Ok(())
}
