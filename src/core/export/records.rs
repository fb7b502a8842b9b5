//! Export record layouts
//!
//! Each record type registers its columns explicitly, in header order.

use super::writer::{Column, CsvRecord};
use crate::core::audit::AuditFinding;
use crate::domain::ids::PatientId;
use crate::domain::patient::PatientRecord;
use std::borrow::Cow;

/// A registry row flattened for the full export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullExportRecord(pub PatientRecord);

impl From<PatientRecord> for FullExportRecord {
    fn from(record: PatientRecord) -> Self {
        Self(record)
    }
}

fn patient_id(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Owned(r.0.patient_id.to_string())
}

fn first_name(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.first_name)
}

fn last_name(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.last_name)
}

fn date_of_birth(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Owned(r.0.date_of_birth_display())
}

fn gender(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.sex)
}

fn phone_number(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.phone)
}

fn street_address(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.street)
}

fn city(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.city)
}

fn state(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.state)
}

fn postal_code(r: &FullExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.0.postal_code)
}

impl FullExportRecord {
    /// Identity, birth date, gender and phone
    pub const BASIC_COLUMNS: &'static [Column<Self>] = &[
        Column::new("PatientId", patient_id),
        Column::new("FirstName", first_name),
        Column::new("LastName", last_name),
        Column::new("DateOfBirth", date_of_birth),
        Column::new("Gender", gender),
        Column::new("PhoneNumber", phone_number),
    ];

    /// The basic layout followed by the address
    pub const EXTENDED_COLUMNS: &'static [Column<Self>] = &[
        Column::new("PatientId", patient_id),
        Column::new("FirstName", first_name),
        Column::new("LastName", last_name),
        Column::new("DateOfBirth", date_of_birth),
        Column::new("Gender", gender),
        Column::new("PhoneNumber", phone_number),
        Column::new("StreetAddress", street_address),
        Column::new("City", city),
        Column::new("State", state),
        Column::new("PostalCode", postal_code),
    ];

    /// Layout for the given address setting
    pub fn columns(include_address: bool) -> &'static [Column<Self>] {
        if include_address {
            Self::EXTENDED_COLUMNS
        } else {
            Self::BASIC_COLUMNS
        }
    }
}

impl CsvRecord for FullExportRecord {
    const COLUMNS: &'static [Column<Self>] = Self::EXTENDED_COLUMNS;
}

/// An incomplete registry row with its audit finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteExportRecord {
    pub patient_id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub field: String,
    pub description: String,
}

impl IncompleteExportRecord {
    /// Classifies `record` with the audit rule set; `None` when complete
    pub fn evaluate(record: PatientRecord) -> Option<Self> {
        let finding = AuditFinding::evaluate(&record)?;
        Some(Self {
            patient_id: record.patient_id,
            first_name: record.first_name,
            last_name: record.last_name,
            field: finding.field,
            description: finding.description,
        })
    }
}

fn incomplete_patient_id(r: &IncompleteExportRecord) -> Cow<'_, str> {
    Cow::Owned(r.patient_id.to_string())
}

fn incomplete_first_name(r: &IncompleteExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.first_name)
}

fn incomplete_last_name(r: &IncompleteExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.last_name)
}

fn incomplete_field(r: &IncompleteExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.field)
}

fn incomplete_description(r: &IncompleteExportRecord) -> Cow<'_, str> {
    Cow::Borrowed(&r.description)
}

impl CsvRecord for IncompleteExportRecord {
    const COLUMNS: &'static [Column<Self>] = &[
        Column::new("PatientId", incomplete_patient_id),
        Column::new("FirstName", incomplete_first_name),
        Column::new("LastName", incomplete_last_name),
        Column::new("Field", incomplete_field),
        Column::new("Description", incomplete_description),
    ];
}
