//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable levels
//! - JSON-formatted local log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use registry_audit::logging::init_logging;
//! use registry_audit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of an audit run
///
/// # Example
///
/// ```no_run
/// use registry_audit::log_audit_complete;
/// use std::time::Duration;
///
/// log_audit_complete!(1000, 204, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_audit_complete {
    ($total:expr, $incomplete:expr, $duration:expr) => {
        tracing::info!(
            total_records = $total,
            incomplete_records = $incomplete,
            duration_ms = $duration.as_millis() as u64,
            "Audit completed"
        );
    };
}

/// Log the completion of a CSV export
///
/// # Example
///
/// ```no_run
/// use registry_audit::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("full", 1000, Duration::from_secs(2));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($kind:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            export_kind = $kind,
            rows_written = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use registry_audit::log_error_with_context;
/// use registry_audit::domain::AppError;
///
/// let error = AppError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
