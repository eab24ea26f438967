use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};

use crate::http::request::decode;
use crate::http::response::{json, ApiError};
use crate::http::server::AppState;
use crate::store::NewDevice;

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let devices = state.store.all_devices().await?;
    tracing::debug!(count = devices.len(), "Listed devices");
    Ok(json(StatusCode::OK, &devices))
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let device: NewDevice = decode(&body)?;
    state.store.add_device(device).await?;
    Ok(json(StatusCode::OK, &serde_json::json!({ "success": true })))
}
