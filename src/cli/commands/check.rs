//! Check command implementation
//!
//! Runs the validation gate over input records without contacting any store.

use super::read_records;
use crate::adapters::store::StoreProvider;
use crate::config::load_config;
use crate::core::ModelRegistry;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Model to check records against
    #[arg(short, long)]
    pub model: String,

    /// JSON file with one record or an array of records
    #[arg(short, long)]
    pub input: String,
}

/// Result of checking a batch of records
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Records that passed the gate
    pub passed: usize,
    /// Records that were rejected
    pub rejected: usize,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(model = %self.model, input = %self.input, "Checking records");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = match ModelRegistry::with_provider(&config, StoreProvider::memory()) {
            Ok(r) => r,
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

        let records = read_records(&self.input)?;
        println!("🔍 Checking {} record(s) against {}", records.len(), model.name());
        println!();

        let mut summary = CheckSummary::default();
        for (index, mut record) in records.into_iter().enumerate() {
            match model.prepare(&mut record) {
                Ok(()) => {
                    summary.passed += 1;
                    match record.id() {
                        Some(id) => println!("  ✅ #{index} _id = {id}"),
                        None => println!("  ✅ #{index} (store-generated _id)"),
                    }
                }
                Err(e) if e.is_rejection() => {
                    summary.rejected += 1;
                    println!("  ❌ #{index} {e}");
                    for detail in e.details() {
                        println!("       {detail}");
                    }
                }
                Err(e) => {
                    println!("❌ {e}");
                    return Ok(2);
                }
            }
        }

        println!();
        println!(
            "Passed: {}, Rejected: {}",
            summary.passed, summary.rejected
        );
        tracing::info!(
            passed = summary.passed,
            rejected = summary.rejected,
            "Check completed"
        );

        Ok(if summary.rejected > 0 { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CheckArgs,
    }

    #[test]
    fn test_check_args_parse() {
        let harness = Harness::parse_from(["check", "--model", "User", "--input", "recs.json"]);
        assert_eq!(harness.args.model, "User");
        assert_eq!(harness.args.input, "recs.json");
    }
}
