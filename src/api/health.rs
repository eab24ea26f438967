use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::http::response::json;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct DbStatus {
    pub database_connected: bool,
    pub timestamp: u64,
}

pub async fn test_db(State(state): State<AppState>) -> Response {
    let database_connected = state.store.test_connection().await;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    json(StatusCode::OK, &DbStatus { database_connected, timestamp })
}
