//! Reseed command implementation
//!
//! This module implements the `reseed` command, which replaces the registry
//! contents with freshly generated synthetic records.

use crate::adapters::registry::{create_postgres_registry, create_registry, RegistryGateway};
use crate::config::load_config;
use crate::core::reseed::ReseedCoordinator;
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the reseed command
#[derive(Args, Debug)]
pub struct ReseedArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Override the number of generated records
    #[arg(long)]
    pub count: Option<usize>,

    /// Override the generator seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generate records without touching the registry
    #[arg(long)]
    pub dry_run: bool,
}

impl ReseedArgs {
    /// Execute the reseed command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting reseed command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(count) = self.count {
            tracing::info!(count, "Overriding record count from CLI");
            config.reseed.record_count = count;
        }
        if let Some(seed) = self.seed {
            tracing::info!(seed, "Overriding generator seed from CLI");
            config.reseed.seed = Some(seed);
        }
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            println!("🔍 DRY RUN MODE - the registry will not be modified");
            println!();
        }

        if !self.yes && !dry_run {
            println!("Reseed Configuration:");
            println!("  Table: {}", config.database.table);
            println!("  Records: {}", config.reseed.record_count);
            println!("  First ID: {}", config.reseed.start_id);
            println!(
                "  Missing Phone Rate: {:.0}%",
                config.reseed.missing_phone_rate * 100.0
            );
            println!();
            println!("⚠️  Every existing registry row will be deleted.");
            print!("Proceed with reseed? [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Reseed cancelled.");
                return Ok(0);
            }
        }

        let registry: Arc<dyn RegistryGateway> = if dry_run {
            config.application.dry_run = true;
            create_registry(&config)?
        } else {
            let registry = create_postgres_registry(&config)?;
            if let Err(e) = registry.ensure_schema().await {
                tracing::error!(error = %e, "Failed to prepare registry schema");
                eprintln!("Failed to prepare registry: {e}");
                return Ok(5);
            }
            Arc::new(registry)
        };

        let coordinator = ReseedCoordinator::new(registry, &config.reseed)?.with_dry_run(dry_run);
        println!("🚀 Starting reseed...");

        let summary = match Arc::new(coordinator).start(shutdown_signal).await? {
            Ok(s) => s,
            Err(e) if e.is_cancelled() => {
                eprintln!("⚠️  Reseed interrupted; registry left unchanged");
                return Ok(1);
            }
            Err(e) => {
                eprintln!("Reseed failed: {e}");
                return Ok(5);
            }
        };

        println!();
        println!("📊 Reseed Summary:");
        println!("  Run ID: {}", summary.run_id);
        println!("  Generated: {}", summary.generated);
        println!("  Without Phone: {}", summary.missing_phone);
        println!("  Rows Removed: {}", summary.removed);
        println!("  Rows Inserted: {}", summary.inserted);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();
        println!("✅ Reseed completed successfully!");
        Ok(0)
    }
}
