// registry-audit - Patient Registry Data-Quality Tool
// Copyright (c) 2025 Registry Audit Contributors
// Licensed under the MIT License

//! # registry-audit - Patient Registry Data-Quality Tool
//!
//! registry-audit checks a patient registry for missing demographic fields,
//! streams findings and full extracts as CSV, and reseeds the registry with
//! synthetic records for demos and tests.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Auditing** every registry row against the completeness rule set
//! - **Exporting** the registry or its incomplete rows as CSV, one flushed
//!   row at a time
//! - **Generating** synthetic registries with a controlled rate of missing
//!   phone numbers
//! - **Reseeding** the registry atomically from generator output
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (audit, export, generate, reseed)
//! - [`adapters`] - Registry gateway trait with PostgreSQL and in-memory backends
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registry_audit::adapters::registry::create_registry;
//! use registry_audit::config::load_config;
//! use registry_audit::core::audit::AuditEngine;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("registry-audit.toml")?;
//!     let registry = create_registry(&config)?;
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//!     let result = AuditEngine::new(registry).run_audit(&shutdown_rx).await.into_result();
//!     println!(
//!         "{} of {} records incomplete",
//!         result.incomplete_records_found, result.total_records_scanned
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming Export
//!
//! Record types register their CSV columns explicitly, and the writer pulls
//! one record at a time, so memory stays flat for any registry size:
//!
//! ```rust,no_run
//! use registry_audit::adapters::memory::InMemoryRegistry;
//! use registry_audit::config::ExportConfig;
//! use registry_audit::core::export::ExportService;
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ExportService::new(Arc::new(InMemoryRegistry::new()), ExportConfig::default());
//! let (_tx, rx) = watch::channel(false);
//! let summary = service.export_incomplete(tokio::io::stdout(), &rx).await?;
//! eprintln!("{} rows", summary.rows_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error type is
//! [`domain::AppError`]. The audit engine is the exception: it never fails,
//! and reports an unreachable registry as
//! [`core::audit::AuditOutcome::Unavailable`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
