//! In-memory registry
//!
//! Backs `--dry-run`, demos and tests. Holds rows in identifier order and
//! swaps the whole table at once on replace.

use crate::adapters::registry::{PatientStream, RegistryGateway, ReplaceSummary};
use crate::core::audit::rules;
use crate::core::shutdown::is_shutdown;
use crate::domain::patient::PatientRecord;
use crate::domain::{RegistryError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::sync::{watch, RwLock};

/// Registry held in process memory
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    rows: RwLock<Vec<PatientRecord>>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `records`, ordered by identifier
    pub fn with_records(mut records: Vec<PatientRecord>) -> Self {
        records.sort_by_key(|r| r.patient_id);
        Self {
            rows: RwLock::new(records),
        }
    }

    /// Copy of the current rows
    pub async fn snapshot(&self) -> Vec<PatientRecord> {
        self.rows.read().await.clone()
    }

    fn stream_of(rows: Vec<PatientRecord>) -> PatientStream {
        stream::iter(rows.into_iter().map(Ok)).boxed()
    }
}

#[async_trait]
impl RegistryGateway for InMemoryRegistry {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn scan_all(&self) -> Result<PatientStream> {
        Ok(Self::stream_of(self.snapshot().await))
    }

    async fn scan_incomplete(&self) -> Result<PatientStream> {
        let rows = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| rules::is_incomplete(r))
            .cloned()
            .collect();
        Ok(Self::stream_of(rows))
    }

    async fn replace_all(
        &self,
        mut records: Vec<PatientRecord>,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary> {
        let total = records.len();
        let mut staged = Vec::with_capacity(total);
        for (inserted, record) in records.drain(..).enumerate() {
            if is_shutdown(shutdown) {
                return Err(RegistryError::Cancelled(format!(
                    "replace stopped after {inserted}/{total} rows; registry unchanged"
                ))
                .into());
            }
            staged.push(record);
        }
        staged.sort_by_key(|r| r.patient_id);

        let mut rows = self.rows.write().await;
        let removed = rows.len() as u64;
        *rows = staged;

        tracing::debug!(removed, inserted = total, "In-memory registry replaced");
        Ok(ReplaceSummary {
            removed,
            inserted: total,
        })
    }
}
