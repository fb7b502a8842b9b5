//! Audit findings and results
//!
//! Request-scoped values: built fresh by every audit run and never persisted.

use super::rules::{self, MissingField};
use crate::domain::ids::PatientId;
use crate::domain::patient::PatientRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One record's audit verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    /// Registry identifier of the incomplete record
    pub patient_id: PatientId,

    /// Missing-field labels joined with `", "`
    pub field: String,

    /// Human-readable description
    pub description: String,

    /// Failing rules in evaluation order; never empty
    #[serde(skip)]
    pub missing_fields: Vec<MissingField>,
}

impl AuditFinding {
    /// Classifies `record`, returning a finding only when it is incomplete
    pub fn evaluate(record: &PatientRecord) -> Option<Self> {
        let missing_fields = rules::missing_fields(record);
        if missing_fields.is_empty() {
            return None;
        }

        Some(Self {
            patient_id: record.patient_id,
            field: rules::field_summary(&missing_fields),
            description: rules::describe(&missing_fields),
            missing_fields,
        })
    }
}

/// Aggregate result of one audit run
///
/// Serializes to the dashboard shape
/// `{totalRecordsScanned, incompleteRecordsFound, incompleteRecords}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Registry row count at the start of the run
    pub total_records_scanned: u64,

    /// Number of findings
    pub incomplete_records_found: u64,

    /// Findings in scan order
    pub incomplete_records: Vec<AuditFinding>,
}

impl AuditResult {
    /// The zero-valued result: no rows, no findings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Share of scanned records that are incomplete, in percent
    pub fn incomplete_rate(&self) -> f64 {
        if self.total_records_scanned == 0 {
            return 0.0;
        }
        (self.incomplete_records_found as f64 / self.total_records_scanned as f64) * 100.0
    }
}

/// Why an audit produced no data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditFailure {
    /// The registry could not be counted or scanned
    Registry(String),

    /// The shutdown signal fired mid-scan
    Cancelled,
}

impl fmt::Display for AuditFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFailure::Registry(reason) => write!(f, "registry unavailable: {reason}"),
            AuditFailure::Cancelled => f.write_str("audit cancelled"),
        }
    }
}

/// Outcome of an audit run
///
/// A failed run still yields a well-formed zero-valued [`AuditResult`] for
/// callers that only understand the wire shape; callers that need to tell
/// "no data yet" from "scan failed" match on the variant instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The registry was fully scanned
    Completed(AuditResult),

    /// The run failed; no partial result is kept
    Unavailable(AuditFailure),
}

impl AuditOutcome {
    /// Whether the registry was fully scanned
    pub fn is_completed(&self) -> bool {
        matches!(self, AuditOutcome::Completed(_))
    }

    /// The wire result; zero-valued when the audit was unavailable
    pub fn result(&self) -> AuditResult {
        match self {
            AuditOutcome::Completed(result) => result.clone(),
            AuditOutcome::Unavailable(_) => AuditResult::empty(),
        }
    }

    /// Consumes the outcome and returns the wire result
    pub fn into_result(self) -> AuditResult {
        match self {
            AuditOutcome::Completed(result) => result,
            AuditOutcome::Unavailable(_) => AuditResult::empty(),
        }
    }
}
