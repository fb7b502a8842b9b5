//! Registry reseeding
//!
//! Replaces the registry contents with freshly generated synthetic records.

pub mod coordinator;

pub use coordinator::{ReseedCoordinator, ReseedSummary};
