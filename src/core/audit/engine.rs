//! Audit engine - scans the registry and classifies every record

use super::report::{AuditFailure, AuditFinding, AuditOutcome, AuditResult};
use crate::adapters::registry::RegistryGateway;
use crate::core::shutdown::{next_or_shutdown, Next};
use crate::domain::{AppError, RegistryError, Result};
use crate::{log_audit_complete, log_error_with_context};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use uuid::Uuid;

/// Data-quality audit over a registry gateway
///
/// Holds no state between runs; concurrent runs are independent.
pub struct AuditEngine {
    registry: Arc<dyn RegistryGateway>,
}

impl AuditEngine {
    /// Create a new audit engine
    pub fn new(registry: Arc<dyn RegistryGateway>) -> Self {
        Self { registry }
    }

    /// Run a full audit
    ///
    /// Counts the registry, then classifies every row of a full scan in scan
    /// order. Never fails: a registry error or a shutdown signal yields
    /// [`AuditOutcome::Unavailable`], whose wire result is zero-valued.
    pub async fn run_audit(&self, shutdown: &watch::Receiver<bool>) -> AuditOutcome {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::info!(
            run_id = %run_id,
            backend = self.registry.backend_name(),
            "Starting data quality audit"
        );

        match self.scan(shutdown).await {
            Ok(result) => {
                log_audit_complete!(
                    result.total_records_scanned,
                    result.incomplete_records_found,
                    start.elapsed()
                );
                AuditOutcome::Completed(result)
            }
            Err(e) if e.is_cancelled() => {
                tracing::warn!(run_id = %run_id, "Audit cancelled; discarding partial result");
                AuditOutcome::Unavailable(AuditFailure::Cancelled)
            }
            Err(e) => {
                log_error_with_context!(&e, "Audit scan failed; reporting zero-valued result");
                AuditOutcome::Unavailable(AuditFailure::Registry(e.to_string()))
            }
        }
    }

    async fn scan(&self, shutdown: &watch::Receiver<bool>) -> Result<AuditResult> {
        let mut shutdown = shutdown.clone();

        let total = self.registry.count().await?;
        let mut rows = self.registry.scan_all().await?;

        let mut findings = Vec::new();
        loop {
            let record = match next_or_shutdown(&mut rows, &mut shutdown).await {
                Next::Item(record) => record?,
                Next::End => break,
                Next::Shutdown => {
                    return Err(AppError::from(RegistryError::Cancelled(
                        "audit scan".to_string(),
                    )))
                }
            };

            if let Some(finding) = AuditFinding::evaluate(&record) {
                tracing::trace!(
                    patient_id = %finding.patient_id,
                    field = %finding.field,
                    "Incomplete record"
                );
                findings.push(finding);
            }
        }

        Ok(AuditResult {
            total_records_scanned: total,
            incomplete_records_found: findings.len() as u64,
            incomplete_records: findings,
        })
    }
}
