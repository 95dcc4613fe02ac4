//! Count command implementation

use crate::config::load_config;
use crate::core::ModelRegistry;
use crate::domain::{Document, ModelError};
use anyhow::Context;
use clap::Args;
use serde_json::Value;

/// Arguments for the count command
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Model whose collection is counted
    #[arg(short, long)]
    pub model: String,

    /// Filter as a JSON object, e.g. '{"person.name": "Fred"}'
    #[arg(short, long)]
    pub filter: Option<String>,
}

impl CountArgs {
    /// Execute the count command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let filter = self.parse_filter()?;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = match ModelRegistry::from_config(&config).await {
            Ok(r) => r,
            Err(ModelError::Store(e)) => {
                println!("❌ Failed to connect to the document store");
                println!("   Error: {e}");
                return Ok(4);
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

        match model.count(filter).await {
            Ok(count) => {
                println!("{count}");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "Count failed");
                println!("❌ Count failed");
                println!("   Error: {e}");
                Ok(if matches!(e, ModelError::Store(ref s) if s.is_transient()) {
                    4
                } else {
                    5
                })
            }
        }
    }

    fn parse_filter(&self) -> anyhow::Result<Option<Document>> {
        let Some(ref raw) = self.filter else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(raw).context("--filter is not valid JSON")?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => anyhow::bail!("--filter must be a JSON object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(filter: Option<&str>) -> CountArgs {
        CountArgs {
            model: "User".to_string(),
            filter: filter.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(args(None).parse_filter().unwrap(), None);

        let parsed = args(Some(r#"{"person.name": "Fred"}"#))
            .parse_filter()
            .unwrap()
            .unwrap();
        assert_eq!(parsed.get("person.name"), Some(&json!("Fred")));
    }

    #[test]
    fn test_parse_filter_rejects_non_objects() {
        assert!(args(Some("[1, 2]")).parse_filter().is_err());
        assert!(args(Some("{oops")).parse_filter().is_err());
    }
}
