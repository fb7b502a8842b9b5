//! Audit command implementation
//!
//! This module implements the `audit` command, which scans the registry and
//! reports records missing required demographic fields.

use crate::adapters::registry::create_registry;
use crate::config::load_config;
use crate::core::audit::{AuditEngine, AuditOutcome, AuditResult};
use clap::{Args, ValueEnum};
use tokio::sync::watch;

/// How audit results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuditFormat {
    /// The dashboard JSON document
    Json,

    /// Human-readable totals and the first findings
    Summary,
}

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = AuditFormat::Summary)]
    pub format: AuditFormat,

    /// Print only the incomplete-records list (JSON format)
    #[arg(long)]
    pub incomplete_only: bool,

    /// Audit an empty in-memory registry instead of the database
    #[arg(long)]
    pub dry_run: bool,
}

/// Findings listed in summary output
const SUMMARY_FINDINGS_SHOWN: usize = 10;

impl AuditArgs {
    /// Execute the audit command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting audit command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        if self.dry_run {
            config.application.dry_run = true;
        }

        let registry = create_registry(&config)?;
        let outcome = AuditEngine::new(registry).run_audit(&shutdown_signal).await;

        if let AuditOutcome::Unavailable(reason) = &outcome {
            tracing::warn!(reason = %reason, "Audit data unavailable");
            eprintln!("⚠️  Audit unavailable: {reason}");
        }

        let result = outcome.result();
        match self.format {
            AuditFormat::Json => println!("{}", self.render_json(&result)?),
            AuditFormat::Summary => Self::print_summary(&result),
        }

        Ok(if outcome.is_completed() { 0 } else { 1 })
    }

    fn render_json(&self, result: &AuditResult) -> serde_json::Result<String> {
        if self.incomplete_only {
            serde_json::to_string_pretty(&result.incomplete_records)
        } else {
            serde_json::to_string_pretty(result)
        }
    }

    fn print_summary(result: &AuditResult) {
        println!("📊 Audit Summary:");
        println!("  Total Records Scanned: {}", result.total_records_scanned);
        println!("  Incomplete Records: {}", result.incomplete_records_found);
        println!("  Incomplete Rate: {:.2}%", result.incomplete_rate());

        if !result.incomplete_records.is_empty() {
            println!();
            for finding in result.incomplete_records.iter().take(SUMMARY_FINDINGS_SHOWN) {
                println!("  - {}: {}", finding.patient_id, finding.description);
            }
            if result.incomplete_records.len() > SUMMARY_FINDINGS_SHOWN {
                println!(
                    "  ... and {} more",
                    result.incomplete_records.len() - SUMMARY_FINDINGS_SHOWN
                );
            }
        }
    }
}
