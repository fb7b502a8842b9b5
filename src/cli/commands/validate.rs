//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use crate::config::{load_config, redact_connection_string};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the registry database is reachable
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Database: {}",
            redact_connection_string(&config.database.connection_string)
        );
        println!("  Table: {}", config.database.table);
        println!("  Max Connections: {}", config.database.max_connections);
        println!("  SSL Mode: {}", config.database.ssl_mode);
        println!("  Reseed Records: {}", config.reseed.record_count);
        println!("  Reseed First ID: {}", config.reseed.start_id);
        println!(
            "  Missing Phone Rate: {:.0}%",
            config.reseed.missing_phone_rate * 100.0
        );
        println!("  Export Directory: {}", config.export.output_dir);
        println!("  Export Address Columns: {}", config.export.include_address);
        println!();

        if self.check_connection && !config.application.dry_run {
            let registry = crate::adapters::registry::create_registry(&config)?;
            match registry.test_connection().await {
                Ok(()) => println!("✅ Registry connection successful"),
                Err(e) => {
                    println!("❌ Registry connection failed");
                    println!("   Error: {e}");
                    return Ok(1);
                }
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[database]\nconnection_string = \"postgresql://u:p@localhost/registry\""
        )
        .unwrap();

        let args = ValidateArgs {
            check_connection: false,
        };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_missing_file_exits_two() {
        let args = ValidateArgs {
            check_connection: false,
        };
        let code = args.execute("/nonexistent/registry-audit.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
