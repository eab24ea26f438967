//! Maintenance tracker backend library.

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{Bootstrapper, Startup};
pub use observability::{LogLevel, Logger};
