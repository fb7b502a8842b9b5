//! Domain error types
//!
//! This module defines the error hierarchy for the registry audit pipeline.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main application error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Registry store errors (connectivity, schema, query)
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Export precondition or encoding errors
    #[error("Export error: {0}")]
    Export(String),

    /// Reseed errors that are not registry failures
    #[error("Reseed error: {0}")]
    Reseed(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Registry-specific errors
///
/// Errors that occur when talking to the backing relational store.
/// These errors don't expose the database driver's types.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The store is unreachable or a connection could not be acquired
    #[error("Failed to connect to registry: {0}")]
    ConnectionFailed(String),

    /// An expected column is absent or has the wrong type
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A query or statement failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A bulk replace failed part way; the store rolled back
    #[error("Replace failed after {inserted}/{total} rows: {message}")]
    ReplaceFailed {
        inserted: usize,
        total: usize,
        message: String,
    },

    /// The operation was stopped by the shutdown signal
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl AppError {
    /// Returns true if the error was caused by cancellation rather than a fault
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Registry(RegistryError::Cancelled(_)))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv encoding errors
impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(format!("CSV encoding error: {err}"))
    }
}
