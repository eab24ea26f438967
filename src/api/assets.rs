//! Static file delivery.
//!
//! Files are looked up by name in each configured directory in turn;
//! the first hit wins. Only single-segment names are served.

use std::path::{Path, PathBuf};

use axum::{
    extract::{Path as UrlPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

const INDEX: &str = "index.html";

/// Ordered list of directories to serve from.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    dirs: Vec<PathBuf>,
}

impl AssetDirs {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Read `name` from the first directory that has it.
    pub async fn read(&self, name: &str) -> Option<Vec<u8>> {
        if !is_plain_name(name) {
            return None;
        }
        for dir in &self.dirs {
            if let Ok(bytes) = tokio::fs::read(dir.join(name)).await {
                return Some(bytes);
            }
        }
        None
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

/// Content type from the file extension; anything unrecognised is HTML.
pub fn content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "text/html",
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{filename}", get(file))
}

async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve(&state, INDEX, "text/html; charset=utf-8").await
}

async fn file(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, ApiError> {
    serve(&state, &filename, content_type(&filename)).await
}

async fn serve(state: &AppState, name: &str, content_type: &'static str) -> Result<Response, ApiError> {
    match state.assets.read(name).await {
        Some(bytes) => Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()),
        None => {
            tracing::debug!(file = %name, "Static asset not found");
            Err(ApiError::NotFound(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type("style.css"), "text/css");
        assert_eq!(content_type("app.js"), "application/javascript");
        assert_eq!(content_type("logo.PNG"), "image/png");
        assert_eq!(content_type("photo.jpg"), "image/jpeg");
        assert_eq!(content_type("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type("about.html"), "text/html");
        assert_eq!(content_type("README"), "text/html");
    }

    #[test]
    fn test_plain_names_only() {
        assert!(is_plain_name("index.html"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name(".env"));
        assert!(!is_plain_name("a/b.css"));
        assert!(!is_plain_name(""));
    }

    #[tokio::test]
    async fn test_directories_searched_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("app.js"), "second").unwrap();
        std::fs::write(second.path().join("index.html"), "second index").unwrap();
        std::fs::write(first.path().join("index.html"), "first index").unwrap();

        let assets = AssetDirs::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(assets.read("index.html").await.unwrap(), b"first index");
        assert_eq!(assets.read("app.js").await.unwrap(), b"second");
        assert!(assets.read("missing.css").await.is_none());
    }
}
