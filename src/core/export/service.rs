//! Export flows
//!
//! Wires registry scans to the streaming CSV writer for the two downloads:
//! the full registry and the incomplete-records list.

use super::records::{FullExportRecord, IncompleteExportRecord};
use super::summary::{ExportStatus, ExportSummary};
use super::writer::{write_csv, CsvRecord};
use crate::adapters::registry::RegistryGateway;
use crate::config::ExportConfig;
use crate::domain::Result;
use crate::log_export_complete;
use futures::{future, TryStreamExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncWrite, BufWriter};
use tokio::sync::watch;

/// Media type of every export
pub const CONTENT_TYPE: &str = "text/csv";

/// Which export to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Every registry row
    Full,

    /// Rows failing at least one completeness rule
    Incomplete,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Full => "full",
            ExportKind::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(ExportKind::Full),
            "incomplete" => Ok(ExportKind::Incomplete),
            other => Err(format!("Unknown export kind '{other}'. Must be one of: full, incomplete")),
        }
    }
}

/// Registry CSV exports
///
/// Stateless apart from its configuration; concurrent exports are
/// independent and each holds one registry connection for its duration.
pub struct ExportService {
    registry: Arc<dyn RegistryGateway>,
    config: ExportConfig,
}

impl ExportService {
    /// Create a new export service
    pub fn new(registry: Arc<dyn RegistryGateway>, config: ExportConfig) -> Self {
        Self { registry, config }
    }

    /// Download filename for `kind`
    pub fn filename(&self, kind: ExportKind) -> &str {
        match kind {
            ExportKind::Full => &self.config.full_filename,
            ExportKind::Incomplete => &self.config.incomplete_filename,
        }
    }

    /// Streams every registry row to `sink`
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be scanned or the sink fails
    /// for a reason other than a disconnect.
    pub async fn export_full<W>(&self, sink: W, shutdown: &watch::Receiver<bool>) -> Result<ExportSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let rows = self.registry.scan_all().await?.map_ok(FullExportRecord::from);
        let columns = FullExportRecord::columns(self.config.include_address);

        let summary = write_csv(rows, columns, sink, shutdown).await?;
        log_export_complete!(ExportKind::Full.as_str(), summary.rows_written, summary.duration);
        Ok(summary)
    }

    /// Streams every incomplete registry row to `sink`
    ///
    /// Rows from the registry's prefilter are re-checked against the audit
    /// rule set, so the output matches the audit's findings.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be scanned or the sink fails
    /// for a reason other than a disconnect.
    pub async fn export_incomplete<W>(
        &self,
        sink: W,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ExportSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let rows = self
            .registry
            .scan_incomplete()
            .await?
            .try_filter_map(|record| future::ready(Ok(IncompleteExportRecord::evaluate(record))));

        let summary = write_csv(rows, IncompleteExportRecord::COLUMNS, sink, shutdown).await?;
        log_export_complete!(
            ExportKind::Incomplete.as_str(),
            summary.rows_written,
            summary.duration
        );
        Ok(summary)
    }

    /// Runs the export for `kind` into `sink`
    pub async fn export<W>(
        &self,
        kind: ExportKind,
        sink: W,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ExportSummary>
    where
        W: AsyncWrite + Unpin,
    {
        match kind {
            ExportKind::Full => self.export_full(sink, shutdown).await,
            ExportKind::Incomplete => self.export_incomplete(sink, shutdown).await,
        }
    }

    /// Writes the export for `kind` to a file
    ///
    /// Rows go to a `.partial` sibling that is renamed to the export's
    /// download filename, in `dir` or the configured output directory, only
    /// once the export completes. A cancelled, disconnected or failed export
    /// removes the partial file, so the returned path exists only when the
    /// summary is complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the export fails.
    pub async fn export_to_file(
        &self,
        kind: ExportKind,
        dir: Option<&Path>,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<(PathBuf, ExportSummary)> {
        let dir = dir.unwrap_or_else(|| Path::new(&self.config.output_dir));
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.filename(kind));

        tracing::info!(
            kind = %kind,
            path = %path.display(),
            content_type = CONTENT_TYPE,
            "Starting export"
        );

        let partial = partial_path(&path);
        let file = tokio::fs::File::create(&partial).await?;
        let summary = match self.export(kind, BufWriter::new(file), shutdown).await {
            Ok(summary) => summary,
            Err(e) => {
                discard_partial(&partial).await;
                return Err(e);
            }
        };

        if summary.status == ExportStatus::Completed {
            tokio::fs::rename(&partial, &path).await?;
        } else {
            tracing::warn!(
                kind = %kind,
                status = %summary.status,
                rows_written = summary.rows_written,
                "Export incomplete; partial file removed"
            );
            discard_partial(&partial).await;
        }
        Ok((path, summary))
    }
}

/// `<name>.partial` next to `path`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

async fn discard_partial(partial: &Path) {
    if let Err(e) = tokio::fs::remove_file(partial).await {
        tracing::warn!(path = %partial.display(), error = %e, "Failed to remove partial export");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryRegistry;
    use crate::domain::ids::PatientId;
    use crate::domain::patient::PatientRecord;
    use test_case::test_case;

    fn registry() -> Arc<dyn RegistryGateway> {
        let complete = PatientRecord::builder(PatientId::new(1).unwrap())
            .first_name("Ada")
            .last_name("Lovelace")
            .street("1 Engine Row")
            .phone("555-123-4567")
            .build();
        let mut no_phone = complete.clone();
        no_phone.patient_id = PatientId::new(2).unwrap();
        no_phone.phone.clear();
        Arc::new(InMemoryRegistry::with_records(vec![complete, no_phone]))
    }

    #[test_case("full", ExportKind::Full)]
    #[test_case(" Incomplete ", ExportKind::Incomplete)]
    fn test_kind_from_str(input: &str, expected: ExportKind) {
        assert_eq!(input.parse::<ExportKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_kind() {
        assert!("audit".parse::<ExportKind>().is_err());
    }

    #[test]
    fn test_default_filenames() {
        let service = ExportService::new(registry(), ExportConfig::default());
        assert_eq!(service.filename(ExportKind::Full), "Full_Patient_Export.csv");
        assert_eq!(
            service.filename(ExportKind::Incomplete),
            "Incomplete_Demographics_Audit_List.csv"
        );
    }

    #[tokio::test]
    async fn test_export_incomplete() {
        let (_tx, rx) = watch::channel(false);
        let service = ExportService::new(registry(), ExportConfig::default());
        let mut out = Vec::new();

        let summary = service.export_incomplete(&mut out, &rx).await.unwrap();

        assert_eq!(summary.rows_written, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PatientId,FirstName,LastName,Field,Description\n\
             2,Ada,Lovelace,Phone,Missing required field(s): Phone.\n"
        );
    }

    #[tokio::test]
    async fn test_export_full_basic_layout() {
        let (_tx, rx) = watch::channel(false);
        let config = ExportConfig {
            include_address: false,
            ..ExportConfig::default()
        };
        let service = ExportService::new(registry(), config);
        let mut out = Vec::new();

        let summary = service.export(ExportKind::Full, &mut out, &rx).await.unwrap();

        assert_eq!(summary.rows_written, 2);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("PatientId,FirstName,LastName,DateOfBirth,Gender,PhoneNumber")
        );
        assert_eq!(lines.next(), Some("1,Ada,Lovelace,,,555-123-4567"));
        assert_eq!(lines.next(), Some("2,Ada,Lovelace,,,"));
    }

    #[tokio::test]
    async fn test_export_to_file() {
        let (_tx, rx) = watch::channel(false);
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new(registry(), ExportConfig::default());

        let (path, summary) = service
            .export_to_file(ExportKind::Full, Some(dir.path()), &rx)
            .await
            .unwrap();

        assert!(path.ends_with("Full_Patient_Export.csv"));
        assert_eq!(summary.rows_written, 2);
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(!dir.path().join("Full_Patient_Export.csv.partial").exists());
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/exports/Full_Patient_Export.csv")),
            PathBuf::from("/exports/Full_Patient_Export.csv.partial")
        );
    }
}
