//! Configuration schema definitions.
//!
//! `[database]` and `server.port` are required; everything else has a
//! default so a minimal file only names the connection and the port.

use std::path::PathBuf;

use serde::Deserialize;

use crate::observability::LogLevel;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Connection settings for the maintenance database.
    pub database: DatabaseConfig,

    /// HTTP listener settings.
    pub server: ServerConfig,

    /// When present, the logger is re-initialized with these settings.
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Database connection settings.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Upper bound on the single connection attempt made at startup.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Connection descriptor for log lines; the password is left out.
    pub fn descriptor(&self) -> String {
        format!(
            "host={} port={} dbname={} user={}",
            self.host, self.port, self.dbname, self.user
        )
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    30
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen port.
    pub port: u16,

    /// Interface to bind (default: all interfaces).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Directories searched in order for static assets.
    #[serde(default = "default_assets_dirs")]
    pub assets_dirs: Vec<PathBuf>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_assets_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("www"), PathBuf::from("../www")]
}

/// Logger settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file, parent directories are created on demand.
    pub file: PathBuf,

    /// Minimum level written.
    pub level: LogLevel,

    /// Also write to stdout/stderr.
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs/webserver.log"),
            level: LogLevel::Debug,
            console: true,
        }
    }
}
