//! Response shaping and error mapping.
//!
//! # Responsibilities
//! - JSON bodies with an explicit UTF-8 content type
//! - Map handler failures to status codes and a `{success, error}` body
//!
//! # Design Decisions
//! - Decode and store failures are client-visible as 400 with the error text
//! - A missing asset is 404; nothing here is ever retried

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Serialize `body` as JSON with `status`.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("File not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) | ApiError::Store(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json(
            self.status(),
            &serde_json::json!({
                "success": false,
                "error": self.to_string(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::from(decode).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(StoreError::Unavailable).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("a.css".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_json_content_type() {
        let response = json(StatusCode::CREATED, &serde_json::json!({ "ok": true }));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_UTF8);
    }
}
