//! Registry gateway abstraction
//!
//! This module defines the trait every registry backend implements. The
//! audit engine, the exporter and the reseed coordinator only talk to the
//! store through it.

use crate::domain::patient::PatientRecord;
use crate::domain::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::watch;

/// Lazily produced sequence of registry rows
///
/// The stream owns whatever connection it reads from and releases it when it
/// is exhausted or dropped.
pub type PatientStream = BoxStream<'static, Result<PatientRecord>>;

/// Result of a bulk replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// Rows present before the table was cleared
    pub removed: u64,

    /// Rows inserted
    pub inserted: usize,
}

/// Read/write adapter over the patient registry
///
/// Implementations must acquire a connection per call, never share one
/// across calls, and surface NULL or whitespace-only text as empty strings.
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;

    /// Test the registry connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Total number of registry rows
    async fn count(&self) -> Result<u64>;

    /// Every row, in registry order (ascending identifier)
    async fn scan_all(&self) -> Result<PatientStream>;

    /// Rows that may be incomplete
    ///
    /// A superset filter evaluated by the store: it never drops a row the
    /// audit rule set would flag. Callers re-apply the rule set to each row.
    async fn scan_incomplete(&self) -> Result<PatientStream>;

    /// Clear the registry, then insert `records`
    ///
    /// Leaves the registry either unchanged or fully replaced. A failure or
    /// a shutdown signal during insertion is returned as an error.
    async fn replace_all(
        &self,
        records: Vec<PatientRecord>,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary>;
}
