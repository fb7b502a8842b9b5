// registry-audit - Patient Registry Data-Quality Tool
// Copyright (c) 2025 Registry Audit Contributors
// Licensed under the MIT License

use clap::Parser;
use registry_audit::cli::{Cli, Commands};
use registry_audit::config::{load_config, LoggingConfig};
use registry_audit::logging::{init_logging, LoggingGuard};
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let logging_guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "registry-audit - Patient Registry Data-Quality Tool"
    );

    // Create shutdown signal channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        eprintln!("\n⚠️  Shutdown signal received, stopping...");
        let _ = shutdown_tx.send(true);
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(logging_guard);
    process::exit(exit_code);
}

/// File logging follows `[logging]` when the config loads; otherwise, or if
/// the log directory is unusable, logging is console-only.
fn setup_logging(cli: &Cli) -> registry_audit::domain::Result<LoggingGuard> {
    let config = if cli.command.uses_config() {
        load_config(&cli.config).ok()
    } else {
        None
    };

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let logging_config = config
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::console_only);

    match init_logging(&log_level, &logging_config) {
        Ok(guard) => Ok(guard),
        Err(e) if logging_config.local_enabled => {
            eprintln!("⚠️  File logging disabled: {e}");
            init_logging(&log_level, &LoggingConfig::console_only())
        }
        Err(e) => Err(e),
    }
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                    }
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                    }
                }
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create SIGTERM handler; listening for Ctrl+C only");
            }
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown..."),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            // Never resolve: without a signal source there is nothing to wait for
            std::future::pending::<()>().await;
        }
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Audit(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Export(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Reseed(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Generate(args) => args.execute(shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
