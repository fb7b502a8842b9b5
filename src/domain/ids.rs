//! Domain identifier types
//!
//! Newtype wrapper for the registry's numeric patient identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient identifier newtype wrapper
///
/// The registry's numeric primary key. Assigned once by the generator and
/// never reused within a generation.
///
/// # Examples
///
/// ```
/// use registry_audit::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("100").unwrap();
/// assert_eq!(id.value(), 100);
/// assert_eq!(id.next().value(), 101);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PatientId(i64);

impl PatientId {
    /// Creates a new PatientId
    ///
    /// Returns `Err` for non-positive values; the registry only holds ids > 0.
    pub fn new(id: i64) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Patient ID must be positive, got {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the raw identifier
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns the identifier immediately after this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns this identifier advanced by `offset`
    pub fn offset(&self, offset: usize) -> Self {
        Self(self.0 + offset as i64)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|e| format!("Invalid patient ID '{s}': {e}"))?;
        Self::new(raw)
    }
}

impl From<PatientId> for i64 {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_valid() {
        let id = PatientId::new(100).unwrap();
        assert_eq!(id.value(), 100);
        assert_eq!(id.to_string(), "100");
    }

    #[test]
    fn test_patient_id_rejects_non_positive() {
        assert!(PatientId::new(0).is_err());
        assert!(PatientId::new(-5).is_err());
    }

    #[test]
    fn test_patient_id_from_str() {
        assert_eq!(PatientId::from_str(" 42 ").unwrap().value(), 42);
        assert!(PatientId::from_str("abc").is_err());
    }

    #[test]
    fn test_patient_id_offset() {
        let id = PatientId::new(100).unwrap();
        assert_eq!(id.offset(0), id);
        assert_eq!(id.offset(999).value(), 1099);
    }

    #[test]
    fn test_patient_id_serializes_as_number() {
        let id = PatientId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
