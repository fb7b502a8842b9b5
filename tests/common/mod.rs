//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use registry_audit::adapters::registry::{PatientStream, RegistryGateway, ReplaceSummary};
use registry_audit::domain::ids::PatientId;
use registry_audit::domain::patient::PatientRecord;
use registry_audit::domain::{RegistryError, Result};
use tokio::sync::watch;

/// A record with every required field populated
pub fn complete(id: i64) -> PatientRecord {
    PatientRecord::builder(PatientId::new(id).unwrap())
        .first_name("Grace")
        .last_name("Hopper")
        .sex("f")
        .street("1 Navy Yard")
        .locality("Arlington", "VA", "22201")
        .phone("555-010-0000")
        .national_id(format!("999-00-{id:04}"))
        .build()
}

/// Registry that is always unreachable
pub struct UnreachableRegistry;

fn unreachable() -> registry_audit::domain::AppError {
    RegistryError::ConnectionFailed("connection refused".to_string()).into()
}

#[async_trait]
impl RegistryGateway for UnreachableRegistry {
    fn backend_name(&self) -> &'static str {
        "unreachable"
    }

    async fn test_connection(&self) -> Result<()> {
        Err(unreachable())
    }

    async fn count(&self) -> Result<u64> {
        Err(unreachable())
    }

    async fn scan_all(&self) -> Result<PatientStream> {
        Err(unreachable())
    }

    async fn scan_incomplete(&self) -> Result<PatientStream> {
        Err(unreachable())
    }

    async fn replace_all(
        &self,
        _records: Vec<PatientRecord>,
        _shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary> {
        Err(unreachable())
    }
}

/// Registry whose scans never yield a row
///
/// Reports `rows` as its count so a caller blocks mid-scan.
pub struct StallingRegistry {
    pub rows: u64,
}

#[async_trait]
impl RegistryGateway for StallingRegistry {
    fn backend_name(&self) -> &'static str {
        "stalling"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.rows)
    }

    async fn scan_all(&self) -> Result<PatientStream> {
        Ok(futures::stream::pending().boxed())
    }

    async fn scan_incomplete(&self) -> Result<PatientStream> {
        Ok(futures::stream::pending().boxed())
    }

    async fn replace_all(
        &self,
        _records: Vec<PatientRecord>,
        _shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary> {
        Err(RegistryError::QueryFailed("read-only registry".to_string()).into())
    }
}

/// Registry whose scan breaks after yielding one incomplete row
pub struct BrokenScanRegistry;

fn broken_scan() -> PatientStream {
    let mut incomplete = complete(1);
    incomplete.phone.clear();
    let rows: Vec<Result<PatientRecord>> = vec![
        Ok(incomplete),
        Err(RegistryError::QueryFailed("connection dropped mid-scan".to_string()).into()),
        Ok(complete(2)),
    ];
    futures::stream::iter(rows).boxed()
}

#[async_trait]
impl RegistryGateway for BrokenScanRegistry {
    fn backend_name(&self) -> &'static str {
        "broken-scan"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(2)
    }

    async fn scan_all(&self) -> Result<PatientStream> {
        Ok(broken_scan())
    }

    async fn scan_incomplete(&self) -> Result<PatientStream> {
        Ok(broken_scan())
    }

    async fn replace_all(
        &self,
        _records: Vec<PatientRecord>,
        _shutdown: &watch::Receiver<bool>,
    ) -> Result<ReplaceSummary> {
        Err(RegistryError::QueryFailed("read-only registry".to_string()).into())
    }
}
