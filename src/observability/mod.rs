//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, bootstrap ──▶ Logger (log_request, log_auth, info_ctx, ...)
//!                               │
//! tower_http, sqlx,             │
//! tracing::* macros ──▶ layer.rs ┘
//!                               ▼
//!                         sink.rs (format_line)
//!                          ├─▶ console (stdout / stderr for ERROR)
//!                          └─▶ log file (append, flushed per line)
//! ```
//!
//! # Design Decisions
//! - One explicitly constructed logger per process, shared via `Arc`
//! - A single mutex serializes state changes and writes
//! - Logging never fails its caller

pub mod layer;
pub mod logger;
pub mod sink;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use layer::LoggerLayer;
pub use logger::Logger;
pub use sink::LogLevel;

const DEFAULT_FILTER: &str = "maintenance_tracker=debug,tower_http=debug,sqlx=warn";

/// Route `tracing` events through `logger`.
///
/// `RUST_LOG` overrides the default per-target filter. A second call is a
/// no-op because a global subscriber is already installed.
pub fn init_tracing(logger: Arc<Logger>) {
    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(LoggerLayer::new(logger.clone()))
        .try_init();

    if installed.is_err() {
        logger.debug_ctx("Tracing subscriber already installed", "observability");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_admits_request_traces() {
        // TraceLayer reports requests and responses at DEBUG.
        assert!(DEFAULT_FILTER.split(',').any(|d| d == "tower_http=debug"));
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }
}
