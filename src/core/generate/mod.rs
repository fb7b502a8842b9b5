//! Synthetic patient record generation
//!
//! Produces registries of realistic-looking demographic rows with a
//! controlled rate of intentionally missing phone numbers.

pub mod generator;

pub use generator::{GeneratedPatients, GeneratorConfig, PatientGenerator};
