//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! DatabaseConfig
//!     → Connector::connect (postgres.rs or memory.rs)
//!     → Arc<dyn Store> (shared by every handler)
//!     → one call per request
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the `Store` trait, never on a driver
//! - The connection is established once at startup, no reconnects
//! - No transactions or locking beyond what the backend provides

pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use memory::{MemoryConnector, MemoryStore};
pub use models::{Device, NewDevice, NewServiceRecord, ServiceHistoryEntry, ServiceRecord, ServiceType};
pub use postgres::{PgConnector, PgStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("database unavailable")]
    Unavailable,
}

/// Data operations over devices, service types and service history.
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the backend. Never errors; an unreachable backend is `false`.
    async fn test_connection(&self) -> bool;

    async fn all_devices(&self) -> Result<Vec<Device>, StoreError>;

    async fn add_device(&self, device: NewDevice) -> Result<(), StoreError>;

    async fn all_service_types(&self) -> Result<Vec<ServiceType>, StoreError>;

    /// Service records joined with their device and service type, newest first.
    async fn detailed_service_history(&self) -> Result<Vec<ServiceHistoryEntry>, StoreError>;

    async fn add_service_record(&self, record: NewServiceRecord) -> Result<(), StoreError>;

    async fn all_service_records(&self) -> Result<Vec<ServiceRecord>, StoreError>;
}

/// Turns connection settings into a connected store.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError>;
}
