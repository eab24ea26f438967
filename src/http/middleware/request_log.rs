//! Request log middleware.
//! Writes one request record for every request whose handler did not.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{client_ip, RequestLogged};
use crate::http::server::AppState;

pub async fn request_log_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let ip = client_ip(&parts);
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let response = next.run(Request::from_parts(parts, body)).await;

    if response.extensions().get::<RequestLogged>().is_none() {
        state.logger.log_request(
            &ip,
            &method,
            &path,
            response.status().as_u16(),
            start.elapsed().as_millis(),
        );
    }
    response
}
