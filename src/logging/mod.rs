//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output
//! - JSON-formatted local file logs with rotation
//! - Helper macros for gate and store events
//!
//! # Example
//!
//! ```no_run
//! use docmodel::logging::init_logging;
//! use docmodel::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a record rejected by the validation gate
///
/// # Example
///
/// ```no_run
/// use docmodel::log_gate_rejection;
/// use docmodel::domain::ModelError;
///
/// let error = ModelError::MissingIdentifier("User".to_string());
/// log_gate_rejection!("User", &error);
/// ```
#[macro_export]
macro_rules! log_gate_rejection {
    ($model:expr, $error:expr) => {
        tracing::warn!(
            model = %$model,
            error = %$error,
            details = $error.details().len(),
            "Record rejected before reaching the store"
        );
    };
}

/// Log a call delegated to the document store
///
/// # Example
///
/// ```no_run
/// use docmodel::log_store_call;
///
/// log_store_call!("User", "users", "insertMany", 3);
/// ```
#[macro_export]
macro_rules! log_store_call {
    ($model:expr, $collection:expr, $operation:expr) => {
        tracing::debug!(
            model = %$model,
            collection = %$collection,
            operation = $operation,
            "Delegating to store"
        );
    };
    ($model:expr, $collection:expr, $operation:expr, $count:expr) => {
        tracing::debug!(
            model = %$model,
            collection = %$collection,
            operation = $operation,
            count = $count,
            "Delegating to store"
        );
    };
}
