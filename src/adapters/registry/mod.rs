//! Registry gateway
//!
//! The trait every registry backend implements, and the factory that picks
//! one from configuration.

pub mod factory;
pub mod traits;

pub use factory::{create_postgres_registry, create_registry};
pub use traits::{PatientStream, RegistryGateway, ReplaceSummary};
