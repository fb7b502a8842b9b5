//! PostgreSQL adapter implementing the registry gateway
//!
//! Scans stream rows straight off the wire: each stream owns its pooled
//! connection and hands it back when exhausted or dropped.

use crate::adapters::postgresql::client::{query_failed, PostgreSQLClient};
use crate::adapters::postgresql::models::{self, InsertParams};
use crate::adapters::registry::{PatientStream, RegistryGateway, ReplaceSummary};
use crate::core::shutdown::is_shutdown;
use crate::domain::patient::PatientRecord;
use crate::domain::{AppError, RegistryError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_postgres::RowStream;

/// PostgreSQL implementation of [`RegistryGateway`]
pub struct PostgreSQLRegistry {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLRegistry {
    /// Create a new PostgreSQL registry
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    /// Create the patient table if it does not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn stream_rows(&self, sql: String) -> Result<PatientStream> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query_raw(sql.as_str(), Vec::<String>::new())
            .await
            .map_err(|e| query_failed("registry scan", e))?;

        let state: Option<(deadpool_postgres::Object, Pin<Box<RowStream>>)> =
            Some((conn, Box::pin(rows)));

        let records = stream::unfold(state, |state| async move {
            let (conn, mut rows) = state?;
            match rows.as_mut().try_next().await {
                Ok(Some(row)) => {
                    let record = models::decode_row(&row);
                    let next = record.is_ok().then_some((conn, rows));
                    Some((record, next))
                }
                Ok(None) => None,
                Err(e) => Some((Err(query_failed("registry scan", e)), None)),
            }
        });

        Ok(records.boxed())
    }

    async fn insert_all(
        &self,
        records: &[PatientRecord],
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary> {
        let table = self.client.table();
        let total = records.len();
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| query_failed("begin replace", e))?;

        let removed: i64 = tx
            .query_one(models::count_sql(table).as_str(), &[])
            .await
            .and_then(|row| row.try_get(0))
            .map_err(|e| query_failed("count before replace", e))?;

        tx.batch_execute(&models::truncate_sql(table))
            .await
            .map_err(|e| query_failed("truncate", e))?;

        let insert = tx
            .prepare_cached(&models::insert_sql(table))
            .await
            .map_err(|e| query_failed("prepare insert", e))?;

        for (inserted, record) in records.iter().enumerate() {
            if is_shutdown(shutdown) {
                return Err(RegistryError::Cancelled(format!(
                    "replace stopped after {inserted}/{total} rows; rolled back"
                ))
                .into());
            }

            let params = InsertParams::new(record);
            tx.execute(&insert, &params.as_params())
                .await
                .map_err(|e| RegistryError::ReplaceFailed {
                    inserted,
                    total,
                    message: e.to_string(),
                })?;
        }

        tx.commit().await.map_err(|e| RegistryError::ReplaceFailed {
            inserted: total,
            total,
            message: format!("commit failed: {e}"),
        })?;

        Ok(ReplaceSummary {
            removed: removed.max(0) as u64,
            inserted: total,
        })
    }
}

#[async_trait]
impl RegistryGateway for PostgreSQLRegistry {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn count(&self) -> Result<u64> {
        let conn = self.client.get_connection().await?;
        let count: i64 = conn
            .query_one(models::count_sql(self.client.table()).as_str(), &[])
            .await
            .and_then(|row| row.try_get(0))
            .map_err(|e| query_failed("count", e))?;

        u64::try_from(count)
            .map_err(|_| AppError::from(RegistryError::SchemaMismatch(format!("negative row count {count}"))))
    }

    async fn scan_all(&self) -> Result<PatientStream> {
        self.stream_rows(models::select_all_sql(self.client.table()))
            .await
    }

    async fn scan_incomplete(&self) -> Result<PatientStream> {
        self.stream_rows(models::select_incomplete_sql(self.client.table()))
            .await
    }

    async fn replace_all(
        &self,
        records: Vec<PatientRecord>,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary> {
        // Dropping the uncommitted transaction on any early return rolls it back
        let summary = self.insert_all(&records, shutdown).await?;

        tracing::info!(
            table = %self.client.table(),
            removed = summary.removed,
            inserted = summary.inserted,
            "Registry replaced"
        );
        Ok(summary)
    }
}
