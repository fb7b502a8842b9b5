//! Export summary and reporting
//!
//! This module defines structures for reporting how a CSV export ended.

use std::fmt;
use std::time::Duration;

/// How a CSV export ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// Every record was written
    Completed,

    /// The sink went away; remaining records were not pulled
    ClientDisconnected,

    /// The shutdown signal fired; remaining records were not pulled
    Cancelled,
}

impl ExportStatus {
    /// Label used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStatus::Completed => "completed",
            ExportStatus::ClientDisconnected => "client_disconnected",
            ExportStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of an export operation
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Data rows written, header excluded
    pub rows_written: usize,

    /// How the export ended
    pub status: ExportStatus,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new summary for an export that has not written anything
    pub fn new() -> Self {
        Self {
            rows_written: 0,
            status: ExportStatus::Completed,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if every record was written
    pub fn is_complete(&self) -> bool {
        self.status == ExportStatus::Completed
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}
