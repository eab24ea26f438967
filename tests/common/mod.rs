//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use maintenance_tracker::api::assets::AssetDirs;
use maintenance_tracker::auth::StaticCredentials;
use maintenance_tracker::http::{build_router, AppState};
use maintenance_tracker::observability::{LogLevel, Logger};
use maintenance_tracker::store::MemoryStore;

/// A router over a fresh memory store, logging to a file in a temp dir.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub logger: Arc<Logger>,
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let logger = file_logger(dir.path());
        let store = Arc::new(MemoryStore::new());
        let www = dir.path().join("www");
        std::fs::create_dir_all(&www).unwrap();

        let state = AppState {
            store: store.clone(),
            logger: logger.clone(),
            authenticator: Arc::new(StaticCredentials),
            assets: Arc::new(AssetDirs::new(vec![www])),
        };
        Self {
            router: build_router(state),
            store,
            logger,
            dir,
        }
    }

    pub fn www(&self) -> PathBuf {
        self.dir.path().join("www")
    }

    pub fn log_lines(&self) -> Vec<String> {
        log_lines(self.dir.path())
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> Response<Body> {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// A file-only logger writing to `dir/app.log`.
#[allow(dead_code)]
pub fn file_logger(dir: &Path) -> Arc<Logger> {
    let logger = Arc::new(Logger::new());
    logger.init(dir.join("app.log"), LogLevel::Debug);
    logger.enable_console(false);
    logger
}

#[allow(dead_code)]
pub fn log_lines(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("app.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
