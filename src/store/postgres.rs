//! PostgreSQL store on a `sqlx` pool.
//!
//! Expects the `devices`, `service_types` and `service_history` tables to
//! exist. Dates and numerics are cast in SQL so rows map onto plain strings
//! and floats.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;

use crate::config::DatabaseConfig;
use crate::store::models::{
    Device, NewDevice, NewServiceRecord, ServiceHistoryEntry, ServiceRecord, ServiceType,
};
use crate::store::{Connector, Store, StoreError};

const ALL_DEVICES: &str = "\
    SELECT id, name, model, purchase_date::text AS purchase_date, status \
    FROM devices ORDER BY id";

const INSERT_DEVICE: &str = "\
    INSERT INTO devices (name, model, purchase_date, status) \
    VALUES ($1, $2, $3::date, $4)";

const ALL_SERVICE_TYPES: &str = "\
    SELECT id, name, recommended_interval_months, standard_cost::float8 AS standard_cost \
    FROM service_types ORDER BY id";

const DETAILED_HISTORY: &str = "\
    SELECT sh.id, sh.device_id, d.name AS device_name, d.model AS device_model, \
           sh.service_id, st.name AS service_name, \
           sh.service_date::text AS service_date, sh.cost::float8 AS cost, \
           COALESCE(sh.notes, '') AS notes, \
           COALESCE(sh.next_due_date::text, '') AS next_due_date \
    FROM service_history sh \
    JOIN devices d ON d.id = sh.device_id \
    JOIN service_types st ON st.id = sh.service_id \
    ORDER BY sh.service_date DESC, sh.id DESC";

const INSERT_SERVICE_RECORD: &str = "\
    INSERT INTO service_history (device_id, service_id, service_date, cost, notes, next_due_date) \
    VALUES ($1, $2, $3::date, $4, $5, NULLIF($6, '')::date)";

const ALL_SERVICE_RECORDS: &str = "\
    SELECT id, device_id, service_id, service_date::text AS service_date, cost::float8 AS cost, \
           COALESCE(notes, '') AS notes, COALESCE(next_due_date::text, '') AS next_due_date \
    FROM service_history ORDER BY id";

fn query_error(e: sqlx::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

/// Connects with the five connection fields of `[database]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
        let store = PgStore::connect(config).await?;
        Ok(Arc::new(store))
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.dbname)
            .username(&config.user)
            .password(&config.password);

        let timeout = Duration::from_secs(config.connect_timeout_secs);

        // One direct attempt: the pool would keep retrying a refused
        // connection until its acquire timeout and hide the cause.
        let conn = tokio::time::timeout(timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|_| {
                StoreError::Connection(format!(
                    "no answer from {}:{} within {}s",
                    config.host, config.port, config.connect_timeout_secs
                ))
            })?
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Closing initial connection failed");
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(timeout)
            .connect_lazy_with(options);

        tracing::debug!(descriptor = %config.descriptor(), "Postgres pool ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn test_connection(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database connection test failed");
                false
            }
        }
    }

    async fn all_devices(&self) -> Result<Vec<Device>, StoreError> {
        sqlx::query_as::<_, Device>(ALL_DEVICES)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn add_device(&self, device: NewDevice) -> Result<(), StoreError> {
        sqlx::query(INSERT_DEVICE)
            .bind(device.name)
            .bind(device.model)
            .bind(device.purchase_date)
            .bind(device.status)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn all_service_types(&self) -> Result<Vec<ServiceType>, StoreError> {
        sqlx::query_as::<_, ServiceType>(ALL_SERVICE_TYPES)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn detailed_service_history(&self) -> Result<Vec<ServiceHistoryEntry>, StoreError> {
        sqlx::query_as::<_, ServiceHistoryEntry>(DETAILED_HISTORY)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn add_service_record(&self, record: NewServiceRecord) -> Result<(), StoreError> {
        sqlx::query(INSERT_SERVICE_RECORD)
            .bind(record.device_id)
            .bind(record.service_id)
            .bind(record.service_date)
            .bind(record.cost)
            .bind(record.notes)
            .bind(record.next_due_date)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn all_service_records(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        sqlx::query_as::<_, ServiceRecord>(ALL_SERVICE_RECORDS)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }
}
