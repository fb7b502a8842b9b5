//! Streaming CSV export
//!
//! This module provides the CSV export pipeline, including:
//! - Column registration tables per record type
//! - The streaming writer with per-row flush
//! - The full and incomplete-records export flows

pub mod records;
pub mod service;
pub mod summary;
pub mod writer;

pub use records::{FullExportRecord, IncompleteExportRecord};
pub use service::{ExportKind, ExportService, CONTENT_TYPE};
pub use summary::{ExportStatus, ExportSummary};
pub use writer::{write_csv, Column, CsvRecord};
