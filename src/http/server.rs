//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with every endpoint
//! - Wire up middleware (request log, CORS header, tracing)
//! - Serve on a bound listener until the shutdown future resolves

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware, Router,
};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api::{self, assets::AssetDirs};
use crate::auth::{self, Authenticator};
use crate::http::middleware::request_log_middleware;
use crate::observability::Logger;
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub logger: Arc<Logger>,
    pub authenticator: Arc<dyn Authenticator>,
    pub assets: Arc<AssetDirs>,
}

/// Build the router with all endpoints and middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes())
        .merge(auth::routes())
        .merge(api::assets::routes())
        .layer(middleware::from_fn_with_state(state.clone(), request_log_middleware))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A fully wired server waiting for a listener.
pub struct HttpServer {
    router: Router,
    bind_address: String,
    port: u16,
    logger: Arc<Logger>,
}

impl HttpServer {
    pub fn new(state: AppState, bind_address: String, port: u16) -> Self {
        let logger = state.logger.clone();
        Self {
            router: build_router(state),
            bind_address,
            port,
            logger,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `bind_address:port` from the configuration.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        self.logger
            .info_ctx(format_args!("Starting server on {}", addr), "http");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.logger.info_ctx("HTTP server stopped", "http");
        Ok(())
    }
}
