//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for docmodel using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// docmodel - MongoDB persistence for schema-validated models
#[derive(Parser, Debug)]
#[command(name = "docmodel")]
#[command(version, about, long_about = None)]
#[command(author = "docmodel Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "docmodel.toml", env = "DOCMODEL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DOCMODEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging section to initialize logging with
    ///
    /// `--log-level` wins over `application.log_level`. `init` runs before any
    /// configuration exists and an unreadable file is reported by the command
    /// itself, so both fall back to console logging at `info`.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = match self.command {
            Commands::Init(_) => None,
            _ => load_config(&self.config).ok(),
        };

        match config {
            Some(config) => (
                self.log_level
                    .clone()
                    .unwrap_or(config.application.log_level),
                config.logging,
            ),
            None => (
                self.log_level.clone().unwrap_or_else(|| "info".to_string()),
                LoggingConfig::default(),
            ),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file and compile model schemas
    ValidateConfig(commands::validate::ValidateArgs),

    /// Run records through the validation gate without writing them
    Check(commands::check::CheckArgs),

    /// Insert records from a JSON file as one batch
    Import(commands::import::ImportArgs),

    /// Count documents in a model's collection
    Count(commands::count::CountArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
