//! Request-side helpers.
//!
//! # Responsibilities
//! - Resolve the client IP for log records
//! - Decode JSON bodies into typed requests
//! - Mark responses whose handler already wrote a request record

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::http::response::ApiError;

/// Peer IP address, or `"unknown"` when the connection info is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip(parts)))
    }
}

pub fn client_ip(parts: &Parts) -> String {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Response extension set by handlers that log their own request record.
#[derive(Debug, Clone, Copy)]
pub struct RequestLogged;

/// Decode a JSON request body. Missing fields and wrong types are decode errors.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[allow(dead_code)]
        id: i32,
    }

    #[test]
    fn test_client_ip() {
        let (mut parts, _) = Request::new(()).into_parts();
        assert_eq!(client_ip(&parts), "unknown");

        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        parts.extensions.insert(ConnectInfo(addr));
        assert_eq!(client_ip(&parts), "10.1.2.3");
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode::<Probe>(br#"{"id": 4}"#).is_ok());
        assert!(matches!(decode::<Probe>(b"{}"), Err(ApiError::Decode(_))));
        assert!(matches!(decode::<Probe>(br#"{"id": "4"}"#), Err(ApiError::Decode(_))));
        assert!(matches!(decode::<Probe>(b"not json"), Err(ApiError::Decode(_))));
    }
}
