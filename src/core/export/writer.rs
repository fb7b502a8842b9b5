//! Streaming CSV writer
//!
//! Records are pulled one at a time, encoded, written and flushed before the
//! next one is requested, so memory stays flat regardless of registry size.

use super::summary::{ExportStatus, ExportSummary};
use crate::core::shutdown::{next_or_shutdown, Next};
use crate::domain::{AppError, Result};
use futures::Stream;
use std::borrow::Cow;
use std::io;
use std::time::Instant;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

/// One CSV column: header name plus value accessor
pub struct Column<T> {
    /// Header text
    pub name: &'static str,

    /// Extracts the field value; blank means an empty field
    pub value: fn(&T) -> Cow<'_, str>,
}

impl<T> Column<T> {
    pub const fn new(name: &'static str, value: fn(&T) -> Cow<'_, str>) -> Self {
        Self { name, value }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column").field("name", &self.name).finish()
    }
}

/// A record type with a registered column layout
///
/// Columns are written in declaration order.
pub trait CsvRecord: Sized + 'static {
    /// Default column layout
    const COLUMNS: &'static [Column<Self>];
}

/// Sink errors that mean the reader has gone away
fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::WriteZero
    )
}

/// Encodes one CSV line terminated by `\n`
///
/// Fields are quoted only when they contain a delimiter, quote or line
/// break; inner quotes are doubled. A blank field is always written empty.
fn encode_line<'a, I>(fields: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Cow<'a, str>>,
{
    let fields: Vec<Cow<'a, str>> = fields.into_iter().collect();

    // The csv crate writes a lone empty field as `""`
    if let [only] = fields.as_slice() {
        if only.is_empty() {
            return Ok(b"\n".to_vec());
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|f| f.as_bytes()))?;
    writer
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV encoding error: {}", e.error())))
}

/// Ends the export after a sink error: a disconnect is a normal outcome,
/// anything else is a failure
fn sink_failed(mut summary: ExportSummary, err: io::Error, start: Instant) -> Result<ExportSummary> {
    if !is_disconnect(&err) {
        return Err(AppError::Io(format!("Export sink failed: {err}")));
    }

    tracing::info!(
        rows_written = summary.rows_written,
        error = %err,
        "Export client disconnected"
    );
    summary.status = ExportStatus::ClientDisconnected;
    Ok(summary.with_duration(start.elapsed()))
}

async fn write_line<W>(sink: &mut W, line: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(line).await?;
    sink.flush().await
}

/// Streams `records` to `sink` as CSV
///
/// Writes the header, then one line per record in stream order. Each line is
/// flushed before the next record is pulled. A disconnected sink or a
/// shutdown signal stops the export early and is reported in the summary's
/// status rather than as an error.
///
/// # Errors
///
/// Returns an error if `columns` is empty (before anything is written), if
/// the record stream yields an error, or if the sink fails for a reason other
/// than a disconnect.
pub async fn write_csv<T, S, W>(
    records: S,
    columns: &[Column<T>],
    mut sink: W,
    shutdown: &watch::Receiver<bool>,
) -> Result<ExportSummary>
where
    S: Stream<Item = Result<T>>,
    W: AsyncWrite + Unpin,
{
    if columns.is_empty() {
        return Err(AppError::Export("no columns registered".to_string()));
    }

    let start = Instant::now();
    let mut shutdown = shutdown.clone();
    let mut records = std::pin::pin!(records);
    let mut summary = ExportSummary::new();

    let header = encode_line(columns.iter().map(|c| Cow::Borrowed(c.name)))?;
    if let Err(e) = write_line(&mut sink, &header).await {
        return sink_failed(summary, e, start);
    }

    loop {
        match next_or_shutdown(&mut records, &mut shutdown).await {
            Next::Item(record) => {
                let record = record?;
                let line = encode_line(columns.iter().map(|c| (c.value)(&record)))?;
                if let Err(e) = write_line(&mut sink, &line).await {
                    return sink_failed(summary, e, start);
                }
                summary.rows_written += 1;
            }
            Next::End => break,
            Next::Shutdown => {
                tracing::info!(rows_written = summary.rows_written, "Export cancelled");
                summary.status = ExportStatus::Cancelled;
                break;
            }
        }
    }

    Ok(summary.with_duration(start.elapsed()))
}
