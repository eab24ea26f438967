//! Rows exchanged with the store.
//!
//! Dates are carried as `YYYY-MM-DD` strings exactly as clients send them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Device {
    pub id: i32,
    pub name: String,
    pub model: String,
    pub purchase_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub model: String,
    pub purchase_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ServiceType {
    pub id: i32,
    pub name: String,
    pub recommended_interval_months: i32,
    pub standard_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ServiceRecord {
    pub id: i32,
    pub device_id: i32,
    pub service_id: i32,
    pub service_date: String,
    pub cost: f64,
    pub notes: String,
    /// Empty when no follow-up is scheduled.
    pub next_due_date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewServiceRecord {
    pub device_id: i32,
    pub service_id: i32,
    pub service_date: String,
    pub cost: f64,
    pub notes: String,
    pub next_due_date: String,
}

/// A service record with the names of what was serviced and how.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ServiceHistoryEntry {
    pub id: i32,
    pub device_id: i32,
    pub device_name: String,
    pub device_model: String,
    pub service_id: i32,
    pub service_name: String,
    pub service_date: String,
    pub cost: f64,
    pub notes: String,
    pub next_due_date: String,
}
