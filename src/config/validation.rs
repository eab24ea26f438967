//! Configuration validation.
//!
//! Serde covers presence and types; this covers values. Every problem is
//! collected so one edit can fix them all.

use std::fmt;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut check = |ok: bool, field: &'static str, reason: &'static str| {
        if !ok {
            errors.push(ValidationError { field, reason });
        }
    };

    let db = &config.database;
    check(!db.host.trim().is_empty(), "database.host", "must not be empty");
    check(db.port != 0, "database.port", "must be non-zero");
    check(!db.dbname.trim().is_empty(), "database.dbname", "must not be empty");
    check(!db.user.trim().is_empty(), "database.user", "must not be empty");
    check(db.max_connections > 0, "database.max_connections", "must be at least 1");
    check(db.connect_timeout_secs > 0, "database.connect_timeout_secs", "must be non-zero");

    check(config.server.port != 0, "server.port", "must be non-zero");
    check(!config.server.assets_dirs.is_empty(), "server.assets_dirs", "must list at least one directory");

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
