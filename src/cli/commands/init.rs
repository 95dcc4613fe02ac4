//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "docmodel.toml")]
    pub output: String,

    /// Include comments explaining every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing docmodel configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set DOCMODEL_MONGODB_URI in your environment or .env file");
                println!("  3. Point each [[models]] entry at its JSON Schema file");
                println!("  4. Validate configuration: docmodel validate-config");
                println!("  5. Check records: docmodel check --model User --input users.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# docmodel configuration

store_target = "mongodb"  # mongodb | memory

[application]
log_level = "info"
dry_run = false

[mongodb]
uri = "${DOCMODEL_MONGODB_URI}"
database_name = "wadofgum_db"
app_name = "docmodel"
connect_timeout_seconds = 10

[write]
w = 1
wtimeout_ms = 5000

[[models]]
name = "User"
collection = "users"
schema_path = "schemas/user.json"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with comments
    fn generate_config_with_examples() -> String {
        r#"# docmodel configuration
#
# Values of the form ${VAR} are read from the environment. Any setting can
# also be overridden with DOCMODEL_<SECTION>_<KEY>, e.g. DOCMODEL_MONGODB_URI.

# ============================================================================
# Store Target
# ============================================================================
# mongodb: write to the [mongodb] deployment below
# memory:  keep documents in process memory (tests, local development)
store_target = "mongodb"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (writes go to an in-memory store)
dry_run = false

# ============================================================================
# MongoDB
# ============================================================================
[mongodb]
# Connection URI; keep credentials out of this file
uri = "${DOCMODEL_MONGODB_URI}"

# Database holding the model collections
database_name = "wadofgum_db"

# Application name reported to the server
app_name = "docmodel"

# Connect and server selection timeout
connect_timeout_seconds = 10

# ============================================================================
# Default Write Concern
# ============================================================================
# Applied to every write that does not set its own w / wtimeout
[write]
# Node count or "majority"
w = 1

# Milliseconds to wait for the write concern
wtimeout_ms = 5000

# ============================================================================
# Models
# ============================================================================
# One [[models]] entry per model type. The schema file is a JSON Schema; an
# optional "metaSchema": {"rids": ["person.name", "person.dateOfBirth"]}
# property derives _id from those fields, joined with "::".
[[models]]
name = "User"

# Defaults to the lower-cased model name
collection = "users"

schema_path = "schemas/user.json"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write JSON logs to local_path in addition to the console
local_enabled = false
local_path = "./logs"

# daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "docmodel.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "docmodel.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse() {
        // The URI placeholder needs a value for substitution to succeed
        std::env::set_var("DOCMODEL_MONGODB_URI", "mongodb://localhost:27017");
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = crate::config::parse_config(&content).unwrap();
            assert_eq!(config.models.len(), 1);
            assert_eq!(config.models[0].collection_name(), "users");
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("docmodel.toml");
        std::fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("[[models]]"));
    }
}
