//! Domain models and types for the registry audit pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`])
//! - **Domain models** ([`PatientRecord`])
//! - **Error types** ([`AppError`], [`RegistryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AppError>`]:
//!
//! ```rust
//! use registry_audit::domain::{AppError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = registry_audit::config::load_config("registry-audit.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{AppError, RegistryError};
pub use ids::PatientId;
pub use patient::{normalize_text, PatientRecord, PatientRecordBuilder};
pub use result::Result;
