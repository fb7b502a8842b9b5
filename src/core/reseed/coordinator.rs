//! Reseed coordinator - regenerates the registry with synthetic data
//!
//! Drives generator output into the registry's bulk replace. It never runs
//! the audit engine; audits simply observe whatever the registry holds.

use crate::adapters::registry::RegistryGateway;
use crate::config::ReseedConfig;
use crate::core::generate::{GeneratorConfig, PatientGenerator};
use crate::core::shutdown::is_shutdown;
use crate::domain::ids::PatientId;
use crate::domain::{AppError, RegistryError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Summary of a reseed run
#[derive(Debug, Clone, PartialEq)]
pub struct ReseedSummary {
    /// Identifier of this run, for correlating logs
    pub run_id: Uuid,

    /// Records produced by the generator
    pub generated: usize,

    /// Rows cleared from the registry
    pub removed: u64,

    /// Rows inserted into the registry
    pub inserted: usize,

    /// Generated records without a phone number
    pub missing_phone: usize,

    /// Whether the registry was left untouched
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,
}

/// Reseed coordinator
pub struct ReseedCoordinator {
    registry: Arc<dyn RegistryGateway>,
    generator: PatientGenerator,
    record_count: usize,
    start_id: PatientId,
    dry_run: bool,
}

impl ReseedCoordinator {
    /// Create a new reseed coordinator
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the reseed settings are invalid.
    pub fn new(registry: Arc<dyn RegistryGateway>, config: &ReseedConfig) -> Result<Self> {
        config.validate().map_err(AppError::Configuration)?;
        let start_id = PatientId::new(config.start_id).map_err(AppError::Configuration)?;
        let generator = PatientGenerator::new(GeneratorConfig::from(config))?;

        Ok(Self {
            registry,
            generator,
            record_count: config.record_count,
            start_id,
            dry_run: false,
        })
    }

    /// Generate records without touching the registry
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Regenerate the registry
    ///
    /// Generates the configured number of records, then clears the registry
    /// and inserts them. The registry is either fully replaced or left as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns the first failure: a registry error, or cancellation if the
    /// shutdown signal fires before the replace commits.
    pub async fn reseed(&self, shutdown: &watch::Receiver<bool>) -> Result<ReseedSummary> {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::info!(
            run_id = %run_id,
            record_count = self.record_count,
            start_id = %self.start_id,
            missing_phone_rate = self.generator.config().missing_phone_rate,
            dry_run = self.dry_run,
            "Starting registry reseed"
        );

        let records: Vec<_> = self
            .generator
            .generate(self.record_count, self.start_id)
            .collect();
        let missing_phone = records.iter().filter(|r| r.phone.is_empty()).count();
        let generated = records.len();

        let mut summary = ReseedSummary {
            run_id,
            generated,
            removed: 0,
            inserted: 0,
            missing_phone,
            dry_run: self.dry_run,
            duration: Duration::from_secs(0),
        };

        if self.dry_run {
            tracing::info!(run_id = %run_id, generated, missing_phone, "Dry run: registry not modified");
            summary.duration = start.elapsed();
            return Ok(summary);
        }

        if is_shutdown(shutdown) {
            return Err(RegistryError::Cancelled("reseed before replace".to_string()).into());
        }

        let replaced = self.registry.replace_all(records, shutdown).await.map_err(|e| {
            tracing::error!(run_id = %run_id, error = %e, "Registry reseed failed");
            e
        })?;

        summary.removed = replaced.removed;
        summary.inserted = replaced.inserted;
        summary.duration = start.elapsed();

        tracing::info!(
            run_id = %run_id,
            removed = summary.removed,
            inserted = summary.inserted,
            missing_phone,
            duration_ms = summary.duration.as_millis() as u64,
            "Registry reseed completed"
        );
        Ok(summary)
    }

    /// Run the reseed in the background
    ///
    /// Returns as soon as the task is spawned; the handle yields the outcome.
    pub fn start(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> JoinHandle<Result<ReseedSummary>> {
        tokio::spawn(async move { self.reseed(&shutdown).await })
    }
}
