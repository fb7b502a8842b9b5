//! Core data-quality pipeline
//!
//! This module contains the audit engine, the streaming CSV exporter, the
//! synthetic record generator and the reseed coordinator.

pub mod audit;
pub mod export;
pub mod generate;
pub mod reseed;
pub mod shutdown;
