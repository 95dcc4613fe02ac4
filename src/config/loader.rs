//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DocModelConfig, StoreTarget};
use super::secret::secret_string;
use crate::domain::errors::ModelError;
use crate::domain::result::Result;
use crate::domain::WriteAck;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DocModelConfig
/// 4. Applies environment variable overrides (DOCMODEL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use docmodel::config::loader::load_config;
///
/// let config = load_config("docmodel.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DocModelConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ModelError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ModelError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Runs the same substitution, override and validation steps as [`load_config`].
///
/// # Errors
///
/// Returns an error if substitution, parsing or validation fails.
pub fn parse_config(contents: &str) -> Result<DocModelConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DocModelConfig = toml::from_str(&contents)
        .map_err(|e| ModelError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ModelError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ModelError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|m| m == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ModelError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the DOCMODEL_* prefix
///
/// Environment variables follow the pattern: DOCMODEL_<SECTION>_<KEY>
/// For example: DOCMODEL_MONGODB_URI, DOCMODEL_APPLICATION_LOG_LEVEL
fn apply_env_overrides(config: &mut DocModelConfig) {
    if let Ok(val) = std::env::var("DOCMODEL_STORE_TARGET") {
        match val.to_lowercase().as_str() {
            "mongodb" => config.store_target = StoreTarget::MongoDb,
            "memory" => config.store_target = StoreTarget::Memory,
            other => tracing::warn!(value = other, "Ignoring unknown DOCMODEL_STORE_TARGET"),
        }
    }

    // Application overrides
    if let Ok(val) = std::env::var("DOCMODEL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("DOCMODEL_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // MongoDB overrides (only if MongoDB is configured)
    if let Some(ref mut mongo_config) = config.mongodb {
        if let Ok(val) = std::env::var("DOCMODEL_MONGODB_URI") {
            mongo_config.uri = secret_string(val);
        }
        if let Ok(val) = std::env::var("DOCMODEL_MONGODB_DATABASE_NAME") {
            mongo_config.database_name = val;
        }
        if let Ok(val) = std::env::var("DOCMODEL_MONGODB_APP_NAME") {
            mongo_config.app_name = val;
        }
        if let Ok(val) = std::env::var("DOCMODEL_MONGODB_CONNECT_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                mongo_config.connect_timeout_seconds = timeout;
            }
        }
    }

    // Write concern overrides
    if let Ok(val) = std::env::var("DOCMODEL_WRITE_W") {
        config.write.w = Some(match val.parse::<u32>() {
            Ok(nodes) => WriteAck::Nodes(nodes),
            Err(_) => WriteAck::Named(val),
        });
    }
    if let Ok(val) = std::env::var("DOCMODEL_WRITE_WTIMEOUT_MS") {
        if let Ok(ms) = val.parse() {
            config.write.wtimeout_ms = Some(ms);
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("DOCMODEL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("DOCMODEL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("DOCMODEL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
