use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::mock_token;
use crate::http::request::{decode, ClientIp, RequestLogged};
use crate::http::response::json;
use crate::http::server::AppState;

const CONTEXT: &str = "auth";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Bytes,
) -> Response {
    let start = Instant::now();

    let request: LoginRequest = match decode(&body) {
        Ok(r) => r,
        Err(e) => {
            state
                .logger
                .log_request(&ip, "POST", "/api/login", 400, start.elapsed().as_millis());
            state.logger.error_ctx(format_args!("Login error: {}", e), CONTEXT);
            return logged(e.into_response());
        }
    };

    let role = state
        .authenticator
        .authenticate(&request.username, &request.password);

    let (status, body) = match role {
        Some(role) => {
            state
                .logger
                .log_auth(&request.username, true, &ip, role.login_message());
            (
                StatusCode::OK,
                LoginResponse {
                    success: true,
                    message: role.login_message().to_string(),
                    token: mock_token(&request.username),
                    username: request.username,
                },
            )
        }
        None => {
            state
                .logger
                .log_auth(&request.username, false, &ip, "Invalid username or password");
            (
                StatusCode::UNAUTHORIZED,
                LoginResponse {
                    success: false,
                    message: "Invalid credentials".to_string(),
                    username: request.username,
                    token: String::new(),
                },
            )
        }
    };

    state.logger.log_request(
        &ip,
        "POST",
        "/api/login",
        status.as_u16(),
        start.elapsed().as_millis(),
    );
    logged(json(status, &body))
}

pub async fn logout(State(state): State<AppState>, ClientIp(ip): ClientIp) -> Response {
    let start = Instant::now();
    state.logger.info_ctx("User logout successful", CONTEXT);

    let response = json(
        StatusCode::OK,
        &LogoutResponse {
            success: true,
            message: "Logged out successfully",
        },
    );
    state
        .logger
        .log_request(&ip, "POST", "/api/logout", 200, start.elapsed().as_millis());
    logged(response)
}

fn logged(mut response: Response) -> Response {
    response.extensions_mut().insert(RequestLogged);
    response
}
