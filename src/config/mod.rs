//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REGISTRY_AUDIT_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [database]
//! connection_string = "${REGISTRY_DATABASE_URL}"
//! table = "patient_data"
//!
//! [reseed]
//! record_count = 1000
//! start_id = 100
//! missing_phone_rate = 0.20
//!
//! [export]
//! output_dir = "./exports"
//! include_address = true
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use registry_audit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("registry-audit.toml")?;
//! println!("Reseed count: {}", config.reseed.record_count);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DatabaseConfig, ExportConfig, LoggingConfig, RegistryAuditConfig,
    ReseedConfig,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
