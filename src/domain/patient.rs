//! Patient record domain model
//!
//! This module defines the registry row type shared by the generator, the
//! gateways, the audit engine and the exporter.

use super::ids::PatientId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of the patient registry
///
/// Text fields are never `None`: absent or whitespace-only values are held as
/// empty strings, so blank checks are uniform across every gateway.
///
/// # Examples
///
/// ```
/// use registry_audit::domain::patient::PatientRecordBuilder;
/// use registry_audit::domain::ids::PatientId;
///
/// let record = PatientRecordBuilder::new(PatientId::new(100).unwrap())
///     .first_name("Ada")
///     .last_name("Lovelace")
///     .street("12 Analytical Way")
///     .build();
///
/// assert!(record.phone.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Registry identifier
    pub patient_id: PatientId,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,

    /// Sex/gender code (`m` / `f` for generated data)
    pub sex: String,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// State or region
    pub state: String,

    /// Postal code
    pub postal_code: String,

    /// Cell phone number; empty when missing
    pub phone: String,

    /// National identifier; empty when missing
    pub national_id: String,
}

impl PatientRecord {
    /// Creates a new builder for constructing a PatientRecord
    pub fn builder(patient_id: PatientId) -> PatientRecordBuilder {
        PatientRecordBuilder::new(patient_id)
    }

    /// Date of birth formatted as `YYYY-MM-DD`, or empty when unknown
    pub fn date_of_birth_display(&self) -> String {
        self.date_of_birth
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Collapses whitespace-only text to an empty string
///
/// Every gateway runs column values through this before handing rows out.
pub fn normalize_text(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => String::new(),
    }
}

/// Builder for constructing PatientRecord instances
#[derive(Debug)]
pub struct PatientRecordBuilder {
    record: PatientRecord,
}

impl PatientRecordBuilder {
    /// Creates a builder with every text field blank
    pub fn new(patient_id: PatientId) -> Self {
        Self {
            record: PatientRecord {
                patient_id,
                first_name: String::new(),
                last_name: String::new(),
                date_of_birth: None,
                sex: String::new(),
                street: String::new(),
                city: String::new(),
                state: String::new(),
                postal_code: String::new(),
                phone: String::new(),
                national_id: String::new(),
            },
        }
    }

    /// Sets the given name
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.record.first_name = value.into();
        self
    }

    /// Sets the family name
    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.record.last_name = value.into();
        self
    }

    /// Sets the date of birth
    pub fn date_of_birth(mut self, value: NaiveDate) -> Self {
        self.record.date_of_birth = Some(value);
        self
    }

    /// Sets the sex code
    pub fn sex(mut self, value: impl Into<String>) -> Self {
        self.record.sex = value.into();
        self
    }

    /// Sets the street address
    pub fn street(mut self, value: impl Into<String>) -> Self {
        self.record.street = value.into();
        self
    }

    /// Sets city, state and postal code together
    pub fn locality(
        mut self,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        self.record.city = city.into();
        self.record.state = state.into();
        self.record.postal_code = postal_code.into();
        self
    }

    /// Sets the phone number
    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.record.phone = value.into();
        self
    }

    /// Sets the national identifier
    pub fn national_id(mut self, value: impl Into<String>) -> Self {
        self.record.national_id = value.into();
        self
    }

    /// Builds the PatientRecord, normalizing whitespace-only text to empty
    pub fn build(self) -> PatientRecord {
        let r = self.record;
        PatientRecord {
            patient_id: r.patient_id,
            first_name: normalize_text(Some(r.first_name)),
            last_name: normalize_text(Some(r.last_name)),
            date_of_birth: r.date_of_birth,
            sex: normalize_text(Some(r.sex)),
            street: normalize_text(Some(r.street)),
            city: normalize_text(Some(r.city)),
            state: normalize_text(Some(r.state)),
            postal_code: normalize_text(Some(r.postal_code)),
            phone: normalize_text(Some(r.phone)),
            national_id: normalize_text(Some(r.national_id)),
        }
    }
}
