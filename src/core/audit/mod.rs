//! Data-quality audit
//!
//! Classifies registry records against the demographic completeness rule set
//! and aggregates the findings into a dashboard-ready result.

pub mod engine;
pub mod report;
pub mod rules;

pub use engine::AuditEngine;
pub use report::{AuditFailure, AuditFinding, AuditOutcome, AuditResult};
pub use rules::MissingField;
