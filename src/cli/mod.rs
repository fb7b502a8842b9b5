//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// registry-audit - Patient registry data-quality tool
#[derive(Parser, Debug)]
#[command(name = "registry-audit")]
#[command(version, about, long_about = None)]
#[command(author = "Registry Audit Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "registry-audit.toml",
        env = "REGISTRY_AUDIT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REGISTRY_AUDIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit the registry for missing demographic fields
    Audit(commands::audit::AuditArgs),

    /// Stream the registry or the incomplete-records list as CSV
    Export(commands::export::ExportArgs),

    /// Replace the registry with synthetic records
    Reseed(commands::reseed::ReseedArgs),

    /// Write synthetic records as CSV without a database
    Generate(commands::generate::GenerateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command reads the configuration file
    pub fn uses_config(&self) -> bool {
        !matches!(self, Commands::Generate(_) | Commands::Init(_))
    }
}
