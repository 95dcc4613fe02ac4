//! Import command implementation
//!
//! Inserts records from a JSON file through the validation gate as one
//! `insertMany` batch.

use super::read_records;
use crate::config::load_config;
use crate::core::ModelRegistry;
use crate::domain::{ModelError, StoreError};
use clap::Args;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Model to import records into
    #[arg(short, long)]
    pub model: String,

    /// JSON file with one record or an array of records
    #[arg(short, long)]
    pub input: String,

    /// Write to an in-memory store instead of the configured one
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(model = %self.model, input = %self.input, "Importing records");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            config.application.dry_run = true;
        }
        if config.application.dry_run {
            println!("🧪 Dry run: records are written to an in-memory store");
        }

        let registry = match ModelRegistry::from_config(&config).await {
            Ok(r) => r,
            Err(ModelError::Store(e)) => {
                println!("❌ Failed to connect to the document store");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
            Err(e) => {
                println!("❌ Model configuration failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        let model = match registry.get(&self.model) {
            Ok(m) => m,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        if let Err(e) = registry.provider().test_connection().await {
            println!("❌ Failed to connect to the document store");
            println!("   Error: {e}");
            return Ok(4);
        }

        let records = read_records(&self.input)?;
        println!(
            "📥 Importing {} record(s) into {}",
            records.len(),
            model.name()
        );

        match model.insert_many(records, None).await {
            Ok(outcome) => {
                println!("✅ Inserted {} record(s)", outcome.inserted_count);
                for id in &outcome.inserted_ids {
                    println!("   _id = {id}");
                }
                Ok(0)
            }
            Err(e) if e.is_rejection() => {
                println!("❌ Batch rejected, nothing was written");
                println!("   Error: {e}");
                for detail in e.details() {
                    println!("     {detail}");
                }
                Ok(1)
            }
            Err(ModelError::Store(StoreError::ConnectionFailed(e))) => {
                println!("❌ Failed to connect to the document store");
                println!("   Error: {e}");
                Ok(4)
            }
            Err(e) => {
                tracing::error!(error = %e, "Import failed");
                println!("❌ Import failed");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ImportArgs,
    }

    #[test]
    fn test_import_args_parse() {
        let harness = Harness::parse_from([
            "import", "--model", "User", "--input", "recs.json", "--dry-run",
        ]);
        assert_eq!(harness.args.model, "User");
        assert!(harness.args.dry_run);

        let harness = Harness::parse_from(["import", "-m", "User", "-i", "recs.json"]);
        assert!(!harness.args.dry_run);
    }
}
