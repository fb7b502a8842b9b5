//! Export command implementation
//!
//! This module implements the `export` command, which streams the full
//! registry or the incomplete-records list as CSV.

use crate::adapters::registry::create_registry;
use crate::config::load_config;
use crate::core::export::{ExportKind, ExportService, ExportStatus, ExportSummary};
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Which export to produce (full or incomplete)
    #[arg(default_value = "full")]
    pub kind: ExportKind,

    /// Directory to write the export file to (defaults to export.output_dir)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write CSV to standard output instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Export from an empty in-memory registry instead of the database
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(kind = %self.kind, "Starting export command");

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
        let service = ExportService::new(registry, config.export.clone());

        let summary = if self.stdout {
            service
                .export(self.kind, tokio::io::stdout(), &shutdown_signal)
                .await
        } else {
            service
                .export_to_file(self.kind, self.output.as_deref(), &shutdown_signal)
                .await
                .map(|(path, summary)| {
                    if summary.is_complete() {
                        eprintln!("📄 Wrote {}", path.display());
                    }
                    summary
                })
        };

        let summary = match summary {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        Ok(Self::report(&summary))
    }

    /// Prints the outcome to stderr and returns the exit code
    fn report(summary: &ExportSummary) -> i32 {
        eprintln!(
            "📊 Rows written: {} in {:.2}s",
            summary.rows_written,
            summary.duration.as_secs_f64()
        );
        match summary.status {
            ExportStatus::Completed => {
                eprintln!("✅ Export completed successfully!");
                0
            }
            ExportStatus::ClientDisconnected => {
                eprintln!("⚠️  Output closed before the export finished");
                1
            }
            ExportStatus::Cancelled => {
                eprintln!("⚠️  Export interrupted by shutdown signal");
                1
            }
        }
    }
}
