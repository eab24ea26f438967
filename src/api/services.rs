//! Service types, service history and raw service records.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};

use crate::http::request::decode;
use crate::http::response::{json, ApiError};
use crate::http::server::AppState;
use crate::store::NewServiceRecord;

pub async fn list_types(State(state): State<AppState>) -> Result<Response, ApiError> {
    let types = state.store.all_service_types().await?;
    Ok(json(StatusCode::OK, &types))
}

/// Records joined with device and service names.
pub async fn history(State(state): State<AppState>) -> Result<Response, ApiError> {
    let history = state.store.detailed_service_history().await?;
    Ok(json(StatusCode::OK, &history))
}

pub async fn create_record(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let record: NewServiceRecord = decode(&body)?;
    tracing::debug!(
        device_id = record.device_id,
        service_id = record.service_id,
        "Adding service record"
    );
    state.store.add_service_record(record).await?;
    Ok(json(StatusCode::OK, &serde_json::json!({ "success": true })))
}

pub async fn list_records(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.all_service_records().await?;
    Ok(json(StatusCode::OK, &records))
}
