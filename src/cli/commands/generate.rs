//! Generate command implementation
//!
//! This module implements the `generate` command, which writes a synthetic
//! registry as CSV without touching any database.

use crate::config::schema::{default_missing_phone_rate, default_record_count, default_start_id};
use crate::core::export::{write_csv, FullExportRecord};
use crate::core::generate::{GeneratorConfig, PatientGenerator};
use crate::domain::ids::PatientId;
use clap::Args;
use futures::stream;
use std::path::PathBuf;
use tokio::io::{AsyncWrite, BufWriter};
use tokio::sync::watch;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of records to generate
    #[arg(short = 'n', long, default_value_t = default_record_count())]
    pub count: usize,

    /// First patient identifier
    #[arg(long, default_value_t = default_start_id())]
    pub start_id: i64,

    /// Probability that a record has no phone number
    #[arg(long, default_value_t = default_missing_phone_rate())]
    pub missing_phone_rate: f64,

    /// Generator seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (defaults to standard output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Omit the address columns
    #[arg(long)]
    pub basic: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
        tracing::info!(count = self.count, "Starting generate command");

        let generator = match self.generator() {
            Ok(g) => g,
            Err(e) => {
                eprintln!("Invalid generator settings: {e}");
                return Ok(2);
            }
        };
        let start_id = match PatientId::new(self.start_id) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid start id: {e}");
                return Ok(2);
            }
        };

        let summary = match &self.output {
            Some(path) => {
                let file = tokio::fs::File::create(path).await?;
                self.write(&generator, start_id, BufWriter::new(file), &shutdown_signal)
                    .await?
            }
            None => {
                self.write(&generator, start_id, tokio::io::stdout(), &shutdown_signal)
                    .await?
            }
        };

        eprintln!("✅ Generated {} records", summary.rows_written);
        Ok(if summary.is_complete() { 0 } else { 1 })
    }

    fn generator(&self) -> crate::domain::Result<PatientGenerator> {
        let mut config = GeneratorConfig::new(self.missing_phone_rate);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        PatientGenerator::new(config)
    }

    async fn write<W>(
        &self,
        generator: &PatientGenerator,
        start_id: PatientId,
        sink: W,
        shutdown: &watch::Receiver<bool>,
    ) -> crate::domain::Result<crate::core::export::ExportSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let records = generator
            .generate(self.count, start_id)
            .map(|record| Ok(FullExportRecord::from(record)));
        write_csv(
            stream::iter(records),
            FullExportRecord::columns(!self.basic),
            sink,
            shutdown,
        )
        .await
    }
}
