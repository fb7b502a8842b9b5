//! PostgreSQL registry integration
//!
//! This module provides the production registry gateway backed by a
//! PostgreSQL table.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLRegistry;
pub use client::PostgreSQLClient;
