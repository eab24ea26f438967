//! In-process store.
//!
//! Mirrors the Postgres store closely enough to drive the HTTP surface in
//! tests: auto-increment ids, foreign-key checks on service records, newest
//! first history. Availability can be switched off to simulate a dead
//! database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::store::models::{
    Device, NewDevice, NewServiceRecord, ServiceHistoryEntry, ServiceRecord, ServiceType,
};
use crate::store::{Connector, Store, StoreError};

#[derive(Default)]
struct Tables {
    devices: Vec<Device>,
    service_types: Vec<ServiceType>,
    records: Vec<ServiceRecord>,
}

fn next_id<T>(rows: &[T], id: impl Fn(&T) -> i32) -> i32 {
    rows.iter().map(id).max().unwrap_or(0) + 1
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Register a service type and return its id.
    pub fn add_service_type(&self, name: &str, recommended_interval_months: i32, standard_cost: f64) -> i32 {
        let mut tables = self.lock();
        let id = next_id(&tables.service_types, |t| t.id);
        tables.service_types.push(ServiceType {
            id,
            name: name.to_string(),
            recommended_interval_months,
            standard_cost,
        });
        id
    }

    /// While unavailable every call fails and `test_connection` reports `false`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(self.lock())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn test_connection(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn all_devices(&self) -> Result<Vec<Device>, StoreError> {
        Ok(self.tables()?.devices.clone())
    }

    async fn add_device(&self, device: NewDevice) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let id = next_id(&tables.devices, |d| d.id);
        tables.devices.push(Device {
            id,
            name: device.name,
            model: device.model,
            purchase_date: device.purchase_date,
            status: device.status,
        });
        Ok(())
    }

    async fn all_service_types(&self) -> Result<Vec<ServiceType>, StoreError> {
        Ok(self.tables()?.service_types.clone())
    }

    async fn detailed_service_history(&self) -> Result<Vec<ServiceHistoryEntry>, StoreError> {
        let tables = self.tables()?;
        let mut history: Vec<ServiceHistoryEntry> = tables
            .records
            .iter()
            .filter_map(|r| {
                let device = tables.devices.iter().find(|d| d.id == r.device_id)?;
                let service = tables.service_types.iter().find(|s| s.id == r.service_id)?;
                Some(ServiceHistoryEntry {
                    id: r.id,
                    device_id: r.device_id,
                    device_name: device.name.clone(),
                    device_model: device.model.clone(),
                    service_id: r.service_id,
                    service_name: service.name.clone(),
                    service_date: r.service_date.clone(),
                    cost: r.cost,
                    notes: r.notes.clone(),
                    next_due_date: r.next_due_date.clone(),
                })
            })
            .collect();
        history.sort_by(|a, b| {
            b.service_date
                .cmp(&a.service_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(history)
    }

    async fn add_service_record(&self, record: NewServiceRecord) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if !tables.devices.iter().any(|d| d.id == record.device_id) {
            return Err(StoreError::Query(format!("unknown device id {}", record.device_id)));
        }
        if !tables.service_types.iter().any(|s| s.id == record.service_id) {
            return Err(StoreError::Query(format!("unknown service id {}", record.service_id)));
        }
        let id = next_id(&tables.records, |r| r.id);
        tables.records.push(ServiceRecord {
            id,
            device_id: record.device_id,
            service_id: record.service_id,
            service_date: record.service_date,
            cost: record.cost,
            notes: record.notes,
            next_due_date: record.next_due_date,
        });
        Ok(())
    }

    async fn all_service_records(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        Ok(self.tables()?.records.clone())
    }
}

/// Hands out a shared [`MemoryStore`], or refuses like an unreachable server.
pub struct MemoryConnector {
    store: Option<Arc<MemoryStore>>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unreachable() -> Self {
        Self { store: None }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
        match &self.store {
            Some(store) => Ok(store.clone() as Arc<dyn Store>),
            None => Err(StoreError::Connection(format!(
                "could not reach {}:{}",
                config.host, config.port
            ))),
        }
    }
}
