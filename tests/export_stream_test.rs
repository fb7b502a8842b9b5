//! Integration tests for the streaming CSV exports

mod common;

use common::complete;
use registry_audit::adapters::memory::InMemoryRegistry;
use registry_audit::config::ExportConfig;
use registry_audit::core::export::{ExportKind, ExportService, ExportStatus};
use registry_audit::domain::AppError;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tempfile::TempDir;
use tokio::io::AsyncWrite;
use tokio::sync::watch;

const INCOMPLETE_HEADER: &str = "PatientId,FirstName,LastName,Field,Description\n";

/// Sink that accepts a fixed number of writes, then fails with `kind`
struct FailingSink {
    accepted: Vec<u8>,
    writes_left: usize,
    kind: io::ErrorKind,
}

impl FailingSink {
    fn new(writes_left: usize, kind: io::ErrorKind) -> Self {
        Self {
            accepted: Vec::new(),
            writes_left,
            kind,
        }
    }
}

impl AsyncWrite for FailingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.writes_left == 0 {
            return Poll::Ready(Err(io::Error::new(self.kind, "sink closed")));
        }
        self.writes_left -= 1;
        self.accepted.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn service(records: Vec<registry_audit::domain::PatientRecord>) -> ExportService {
    ExportService::new(
        Arc::new(InMemoryRegistry::with_records(records)),
        ExportConfig::default(),
    )
}

#[tokio::test]
async fn test_full_export_quotes_awkward_values() {
    let (_tx, rx) = watch::channel(false);
    let mut awkward = complete(7);
    awkward.first_name = "Anne \"Nan\"".to_string();
    awkward.last_name = "Smith, Jr.".to_string();
    awkward.street = "Flat 2\nRose Court".to_string();

    let mut out = Vec::new();
    let summary = service(vec![awkward.clone()])
        .export_full(&mut out, &rx)
        .await
        .unwrap();
    assert_eq!(summary.rows_written, 1);
    assert!(summary.is_complete());

    let text = String::from_utf8(out.clone()).unwrap();
    assert!(text.contains("\"Anne \"\"Nan\"\"\""));
    assert!(text.contains("\"Smith, Jr.\""));

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 10);
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[0], "7");
    assert_eq!(&row[1], awkward.first_name);
    assert_eq!(&row[2], awkward.last_name);
    assert_eq!(&row[6], awkward.street);
}

#[tokio::test]
async fn test_export_is_repeatable() {
    let (_tx, rx) = watch::channel(false);
    let mut no_phone = complete(2);
    no_phone.phone.clear();
    let service = service(vec![complete(1), no_phone, complete(3)]);

    for kind in [ExportKind::Full, ExportKind::Incomplete] {
        let mut first = Vec::new();
        let mut second = Vec::new();
        service.export(kind, &mut first, &rx).await.unwrap();
        service.export(kind, &mut second, &rx).await.unwrap();
        assert_eq!(first, second, "{kind} export changed between runs");
    }
}

#[tokio::test]
async fn test_incomplete_export_with_no_findings_is_header_only() {
    let (_tx, rx) = watch::channel(false);
    let mut out = Vec::new();
    let summary = service(vec![complete(1), complete(2)])
        .export_incomplete(&mut out, &rx)
        .await
        .unwrap();

    assert_eq!(summary.rows_written, 0);
    assert_eq!(String::from_utf8(out).unwrap(), INCOMPLETE_HEADER);
}

#[tokio::test]
async fn test_incomplete_export_of_empty_registry() {
    let (_tx, rx) = watch::channel(false);
    let mut out = Vec::new();
    service(Vec::new())
        .export_incomplete(&mut out, &rx)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), INCOMPLETE_HEADER);
}

#[tokio::test]
async fn test_incomplete_export_rows() {
    let (_tx, rx) = watch::channel(false);
    let mut both = complete(10);
    both.street.clear();
    both.phone.clear();

    let mut out = Vec::new();
    service(vec![complete(9), both])
        .export_incomplete(&mut out, &rx)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            INCOMPLETE_HEADER.trim_end(),
            "10,Grace,Hopper,\"Address, Phone\",Missing required field(s): Address and Phone.",
        ]
    );
}

#[tokio::test]
async fn test_client_disconnect_ends_export_cleanly() {
    let (_tx, rx) = watch::channel(false);
    let service = service(vec![complete(1), complete(2), complete(3)]);

    // Header and one row get through
    let mut sink = FailingSink::new(2, io::ErrorKind::BrokenPipe);
    let summary = service.export_full(&mut sink, &rx).await.unwrap();

    assert_eq!(summary.status, ExportStatus::ClientDisconnected);
    assert_eq!(summary.rows_written, 1);
    assert_eq!(String::from_utf8(sink.accepted).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn test_sink_fault_is_an_error() {
    let (_tx, rx) = watch::channel(false);
    let mut sink = FailingSink::new(1, io::ErrorKind::PermissionDenied);

    let err = service(vec![complete(1)])
        .export_full(&mut sink, &rx)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[tokio::test]
async fn test_export_to_file_uses_download_name() {
    let (_tx, rx) = watch::channel(false);
    let dir = TempDir::new().unwrap();

    let (path, summary) = service(vec![complete(1), complete(2)])
        .export_to_file(ExportKind::Full, Some(dir.path()), &rx)
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("Full_Patient_Export.csv"));
    assert_eq!(summary.rows_written, 2);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 2);
}

#[tokio::test]
async fn test_cancelled_file_export_leaves_no_download() {
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let dir = TempDir::new().unwrap();

    let (path, summary) = service(vec![complete(1), complete(2)])
        .export_to_file(ExportKind::Full, Some(dir.path()), &rx)
        .await
        .unwrap();

    assert_eq!(summary.status, ExportStatus::Cancelled);
    assert!(!path.exists(), "cancelled export left {} in place", path.display());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cancelled_export_keeps_previous_download() {
    let (_tx, live) = watch::channel(false);
    let dir = TempDir::new().unwrap();
    let service = service(vec![complete(1), complete(2)]);

    let (path, _) = service
        .export_to_file(ExportKind::Incomplete, Some(dir.path()), &live)
        .await
        .unwrap();
    let before = std::fs::read(&path).unwrap();

    let (tx, stopped) = watch::channel(false);
    tx.send(true).unwrap();
    let (again, summary) = service
        .export_to_file(ExportKind::Incomplete, Some(dir.path()), &stopped)
        .await
        .unwrap();

    assert_eq!(again, path);
    assert!(!summary.is_complete());
    assert_eq!(std::fs::read(&path).unwrap(), before);
}
