//! Demographic completeness rule set
//!
//! The single source of truth for what "incomplete" means. The audit engine
//! and the incomplete-records export both classify through this module, so
//! they always reach the same verdict for the same record.

use crate::domain::patient::PatientRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every finding description
const DESCRIPTION_PREFIX: &str = "Missing required field(s): ";

/// A required demographic field
///
/// Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MissingField {
    FirstName,
    LastName,
    Address,
    Phone,
}

impl MissingField {
    /// Every rule, in evaluation order
    pub const ALL: [MissingField; 4] = [
        MissingField::FirstName,
        MissingField::LastName,
        MissingField::Address,
        MissingField::Phone,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MissingField::FirstName => "First Name",
            MissingField::LastName => "Last Name",
            MissingField::Address => "Address",
            MissingField::Phone => "Phone",
        }
    }

    /// The record value this rule inspects
    fn value<'a>(&self, record: &'a PatientRecord) -> &'a str {
        match self {
            MissingField::FirstName => &record.first_name,
            MissingField::LastName => &record.last_name,
            MissingField::Address => &record.street,
            MissingField::Phone => &record.phone,
        }
    }

    /// Whether this field is blank on `record`
    pub fn is_missing(&self, record: &PatientRecord) -> bool {
        is_blank(self.value(record))
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Empty or whitespace-only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Every failing rule for `record`, in evaluation order
pub fn missing_fields(record: &PatientRecord) -> Vec<MissingField> {
    MissingField::ALL
        .into_iter()
        .filter(|field| field.is_missing(record))
        .collect()
}

/// Whether `record` fails at least one rule
pub fn is_incomplete(record: &PatientRecord) -> bool {
    MissingField::ALL.iter().any(|field| field.is_missing(record))
}

/// Labels joined with `", "`, e.g. `Address, Phone`
pub fn field_summary(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(MissingField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable description of a finding
///
/// A single failure is named on its own. Several failures are listed in
/// evaluation order with the last two joined by "and", which yields
/// `Address and Phone` when both contact fields are missing.
pub fn describe(fields: &[MissingField]) -> String {
    let phrase = match fields {
        [] => return String::new(),
        [only] => only.label().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter()
                .map(MissingField::label)
                .collect::<Vec<_>>()
                .join(", "),
            last.label()
        ),
    };
    format!("{DESCRIPTION_PREFIX}{phrase}.")
}
