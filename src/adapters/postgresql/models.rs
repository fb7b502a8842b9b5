//! PostgreSQL row mapping
//!
//! Column layout of the patient table, the SQL built from it, and decoding
//! of result rows into [`PatientRecord`]s.

use crate::domain::ids::PatientId;
use crate::domain::patient::{normalize_text, PatientRecord};
use crate::domain::{RegistryError, Result};
use chrono::NaiveDate;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Columns in select/insert order
pub const COLUMNS: [&str; 11] = [
    "pid",
    "fname",
    "lname",
    "dob",
    "sex",
    "street",
    "city",
    "state",
    "postal_code",
    "phone_cell",
    "ss",
];

/// Columns checked by the incomplete-rows prefilter
const REQUIRED_TEXT_COLUMNS: [&str; 4] = ["fname", "lname", "street", "phone_cell"];

/// Non-ASCII code points Rust's `char::is_whitespace` accepts, as
/// inclusive ranges
const UNICODE_WHITESPACE: [(u32, u32); 8] = [
    (0x0085, 0x0085),
    (0x00A0, 0x00A0),
    (0x1680, 0x1680),
    (0x2000, 0x200A),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x205F, 0x205F),
    (0x3000, 0x3000),
];

/// Postgres regex matching values made only of whitespace
///
/// Covers every character `char::is_whitespace` accepts, so the prefilter
/// never drops a row the rule set would flag.
fn blank_pattern() -> String {
    let extra: String = UNICODE_WHITESPACE
        .iter()
        .map(|&(lo, hi)| {
            if lo == hi {
                format!("\\u{lo:04x}")
            } else {
                format!("\\u{lo:04x}-\\u{hi:04x}")
            }
        })
        .collect();
    format!("^[[:space:]{extra}]*$")
}

/// Rows the registry treats as patients; count and scans share it
const VALID_ROW: &str = "pid > 0";

/// Full-table scan in identifier order
pub fn select_all_sql(table: &str) -> String {
    format!(
        "SELECT {} FROM {table} WHERE {VALID_ROW} ORDER BY pid",
        COLUMNS.join(", ")
    )
}

/// Scan restricted to rows where any required field is blank
pub fn select_incomplete_sql(table: &str) -> String {
    let pattern = blank_pattern();
    let predicate = REQUIRED_TEXT_COLUMNS
        .iter()
        .map(|col| format!("COALESCE({col}, '') ~ '{pattern}'"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!(
        "SELECT {} FROM {table} WHERE {VALID_ROW} AND ({predicate}) ORDER BY pid",
        COLUMNS.join(", ")
    )
}

/// Row count
pub fn count_sql(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {table} WHERE {VALID_ROW}")
}

/// Table clear
pub fn truncate_sql(table: &str) -> String {
    format!("TRUNCATE TABLE {table}")
}

/// Single-row insert with one placeholder per column
pub fn insert_sql(table: &str) -> String {
    let placeholders = (1..=COLUMNS.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        COLUMNS.join(", ")
    )
}

/// Insert parameters for a record
///
/// Blank text is stored as NULL.
pub struct InsertParams<'a> {
    pid: i64,
    dob: Option<NaiveDate>,
    text: [Option<&'a str>; 9],
}

impl<'a> InsertParams<'a> {
    pub fn new(record: &'a PatientRecord) -> Self {
        let nullable = |value: &'a str| (!value.trim().is_empty()).then_some(value);
        Self {
            pid: record.patient_id.value(),
            dob: record.date_of_birth,
            text: [
                nullable(&record.first_name),
                nullable(&record.last_name),
                nullable(&record.sex),
                nullable(&record.street),
                nullable(&record.city),
                nullable(&record.state),
                nullable(&record.postal_code),
                nullable(&record.phone),
                nullable(&record.national_id),
            ],
        }
    }

    /// Parameters in [`COLUMNS`] order
    pub fn as_params(&self) -> Vec<&(dyn ToSql + Sync)> {
        let [fname, lname, sex, street, city, state, postal, phone, ss] = &self.text;
        vec![
            &self.pid, fname, lname, &self.dob, sex, street, city, state, postal, phone, ss,
        ]
    }
}

fn text(row: &Row, column: &str) -> Result<String> {
    row.try_get::<_, Option<String>>(column)
        .map(normalize_text)
        .map_err(|e| schema_error(column, e))
}

fn schema_error(column: &str, err: tokio_postgres::Error) -> crate::domain::AppError {
    RegistryError::SchemaMismatch(format!("column '{column}': {err}")).into()
}

/// Decodes a row selected with [`COLUMNS`]
///
/// # Errors
///
/// Returns a schema error if a column is absent, has an unexpected type, or
/// the identifier is not positive.
pub fn decode_row(row: &Row) -> Result<PatientRecord> {
    let pid: i64 = row.try_get("pid").map_err(|e| schema_error("pid", e))?;
    let patient_id = PatientId::new(pid).map_err(RegistryError::SchemaMismatch)?;
    let dob: Option<NaiveDate> = row.try_get("dob").map_err(|e| schema_error("dob", e))?;

    let mut builder = PatientRecord::builder(patient_id)
        .first_name(text(row, "fname")?)
        .last_name(text(row, "lname")?)
        .sex(text(row, "sex")?)
        .street(text(row, "street")?)
        .locality(
            text(row, "city")?,
            text(row, "state")?,
            text(row, "postal_code")?,
        )
        .phone(text(row, "phone_cell")?)
        .national_id(text(row, "ss")?);
    if let Some(dob) = dob {
        builder = builder.date_of_birth(dob);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_sql() {
        assert_eq!(
            select_all_sql("patient_data"),
            "SELECT pid, fname, lname, dob, sex, street, city, state, postal_code, phone_cell, ss \
             FROM patient_data WHERE pid > 0 ORDER BY pid"
        );
    }

    #[test]
    fn test_count_matches_scan_predicate() {
        assert_eq!(
            count_sql("patient_data"),
            "SELECT COUNT(*) FROM patient_data WHERE pid > 0"
        );
        assert!(select_all_sql("patient_data").contains("WHERE pid > 0"));
        assert!(select_incomplete_sql("patient_data").contains("WHERE pid > 0 AND ("));
    }

    #[test]
    fn test_incomplete_predicate_covers_required_fields() {
        let sql = select_incomplete_sql("patient_data");
        for col in REQUIRED_TEXT_COLUMNS {
            assert!(sql.contains(&format!("COALESCE({col}, '')")), "{col} missing");
        }
        assert_eq!(sql.matches(" OR ").count(), 3);
        assert!(sql.ends_with("ORDER BY pid"));
    }

    #[test]
    fn test_blank_pattern() {
        assert_eq!(
            blank_pattern(),
            r"^[[:space:]\u0085\u00a0\u1680\u2000-\u200a\u2028-\u2029\u202f\u205f\u3000]*$"
        );
    }

    #[test]
    fn test_unicode_whitespace_table_is_complete() {
        let covered = |c: char| {
            c.is_ascii_whitespace()
                || c == '\u{0B}'
                || UNICODE_WHITESPACE
                    .iter()
                    .any(|&(lo, hi)| (lo..=hi).contains(&(c as u32)))
        };
        for c in (0..=0x10FFFFu32).filter_map(char::from_u32) {
            if c.is_whitespace() {
                assert!(covered(c), "U+{:04X} not covered", c as u32);
            }
        }
    }

    #[test]
    fn test_insert_sql_placeholders() {
        assert_eq!(
            insert_sql("t"),
            "INSERT INTO t (pid, fname, lname, dob, sex, street, city, state, postal_code, phone_cell, ss) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );
    }

    #[test]
    fn test_insert_params_store_blank_as_null() {
        let record = PatientRecord::builder(PatientId::new(5).unwrap())
            .first_name("Barbara")
            .build();
        let params = InsertParams::new(&record);
        assert_eq!(params.pid, 5);
        assert_eq!(params.text[0], Some("Barbara"));
        assert_eq!(params.text[7], None);
        assert_eq!(params.as_params().len(), COLUMNS.len());
    }
}
