//! Data endpoints and static assets.
//!
//! Each handler makes exactly one store call (or one file read) and
//! answers JSON; failures become [`ApiError`](crate::http::ApiError)s.

pub mod assets;
pub mod devices;
pub mod health;
pub mod services;

use axum::{routing::get, Router};

use crate::http::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/test-db", get(health::test_db))
        .route("/api/devices", get(devices::list).post(devices::create))
        .route("/api/service-types", get(services::list_types))
        .route(
            "/api/service-history",
            get(services::history).post(services::create_record),
        )
        .route("/api/service-records", get(services::list_records))
}
