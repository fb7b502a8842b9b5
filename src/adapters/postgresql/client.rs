//! PostgreSQL client implementation
//!
//! This module owns the connection pool for the registry database.

use crate::config::{redact_connection_string, DatabaseConfig};
use crate::domain::{AppError, RegistryError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};
use tokio_postgres::{NoTls, Socket};

const MIGRATION_SQL: &str = include_str!("../../../migrations/001_patient_data.sql");

/// How the client secures its connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TlsPolicy {
    /// Plaintext only
    Disabled,

    /// Encrypt without verifying the server certificate
    Unverified(SslMode),

    /// Verify the certificate chain but not the host name
    VerifyCa,

    /// Verify the certificate chain and the host name
    VerifyFull,
}

impl TlsPolicy {
    fn from_ssl_mode(mode: &str) -> Result<Self> {
        match mode {
            "disable" => Ok(Self::Disabled),
            "prefer" => Ok(Self::Unverified(SslMode::Prefer)),
            "require" => Ok(Self::Unverified(SslMode::Require)),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(AppError::Configuration(format!(
                "Unsupported ssl_mode '{other}'"
            ))),
        }
    }

    fn ssl_mode(&self) -> SslMode {
        match self {
            Self::Disabled => SslMode::Disable,
            Self::Unverified(mode) => *mode,
            Self::VerifyCa | Self::VerifyFull => SslMode::Require,
        }
    }

    fn connector(&self) -> Result<Option<MakeTlsConnector>> {
        let mut builder = native_tls::TlsConnector::builder();
        match self {
            Self::Disabled => return Ok(None),
            Self::Unverified(_) => {
                builder.danger_accept_invalid_certs(true);
            }
            Self::VerifyCa => {
                builder.danger_accept_invalid_hostnames(true);
            }
            Self::VerifyFull => {}
        }
        let connector = builder
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build TLS connector: {e}")))?;
        Ok(Some(MakeTlsConnector::new(connector)))
    }
}

/// PostgreSQL client for the patient registry
///
/// Every call acquires its own pooled connection; the pool is the only place
/// `max_connections` is enforced.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: DatabaseConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string or TLS settings are invalid.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse()
            .map_err(|e| {
                AppError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let policy = TlsPolicy::from_ssl_mode(&config.ssl_mode)?;
        pg_config.ssl_mode(policy.ssl_mode());
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let pool = match policy.connector()? {
            Some(tls) => build_pool(pg_config, tls, &config)?,
            None => build_pool(pg_config, NoTls, &config)?,
        };

        tracing::debug!(
            target_db = %redact_connection_string(&config.connection_string),
            ssl_mode = %config.ssl_mode,
            max_connections = config.max_connections,
            "PostgreSQL pool configured"
        );

        Ok(Self { pool, config })
    }

    /// Table holding the patient rows
    pub fn table(&self) -> &str {
        &self.config.table
    }

    /// Test the connection to PostgreSQL
    ///
    /// Attempts to get a connection from the pool and execute a simple query.
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| RegistryError::ConnectionFailed(format!("Connection test failed: {e}")))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Create the patient table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the migration fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;

        let migration = MIGRATION_SQL.replace("{{table}}", &self.config.table);
        client
            .batch_execute(&migration)
            .await
            .map_err(|e| query_failed("schema migration", e))?;

        tracing::info!(table = %self.config.table, "PostgreSQL schema initialized");
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| {
            RegistryError::ConnectionFailed(format!("Failed to get connection from pool: {e}"))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| query_failed("set statement timeout", e))?;

        Ok(client)
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(&self.config.connection_string)
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn build_pool<T>(pg_config: tokio_postgres::Config, tls: T, config: &DatabaseConfig) -> Result<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let manager = Manager::from_config(
        pg_config,
        tls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
    Pool::builder(manager)
        .max_size(config.max_connections)
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .wait_timeout(timeout)
        .create_timeout(timeout)
        .recycle_timeout(timeout)
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create connection pool: {e}")))
}

/// Maps a driver error to a registry query error
pub(crate) fn query_failed(context: &str, err: tokio_postgres::Error) -> AppError {
    RegistryError::QueryFailed(format!("{context}: {err}")).into()
}
