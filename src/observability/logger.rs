//! The process logger.
//!
//! One [`Logger`] is created by `main`, initialized before anything else runs,
//! and shared through `Arc` with the bootstrapper, the tracing bridge and
//! every request handler. All state lives behind a single mutex that each
//! public call holds for its whole duration, writes included, so concurrent
//! records never interleave within a line.
//!
//! The logger never reports errors. A directory that cannot be created or a
//! file that cannot be opened leaves the file sink disabled and logging
//! continues on the console.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;

use super::sink::{self, LogLevel};

const DEFAULT_LOG_PATH: &str = "logs/app.log";

struct LoggerState {
    min_level: LogLevel,
    console_enabled: bool,
    file_enabled: bool,
    file: Option<File>,
    file_path: PathBuf,
}

impl LoggerState {
    fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Open the configured path for append, creating its parent directory.
    fn open_file(&mut self) -> bool {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && fs::create_dir_all(parent).is_err() {
                self.file = None;
                return false;
            }
        }
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .ok();
        self.file.is_some()
    }

    fn emit(&mut self, level: LogLevel, message: &dyn fmt::Display, context: Option<&str>) {
        if !self.console_enabled && !self.file_enabled {
            return;
        }
        let line = sink::format_line(&Local::now().naive_local(), level, message, context);
        if self.console_enabled {
            sink::write_console(level, &line);
        }
        if self.file_enabled {
            sink::write_file(self.file.as_mut(), &line);
        }
    }
}

/// Leveled, dual-sink logger.
pub struct Logger {
    state: Mutex<LoggerState>,
}

impl Logger {
    /// A console-only logger at DEBUG; call [`Logger::init`] to add the file sink.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoggerState {
                min_level: LogLevel::Debug,
                console_enabled: true,
                file_enabled: false,
                file: None,
                file_path: PathBuf::from(DEFAULT_LOG_PATH),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        // A panic while holding the lock cannot leave the state inconsistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the threshold, enable both sinks and (re)open `path` for append.
    ///
    /// Can be called again to reconfigure; the previous file is closed.
    pub fn init(&self, path: impl AsRef<Path>, level: LogLevel) {
        let mut state = self.lock();
        state.file_path = path.as_ref().to_path_buf();
        state.min_level = level;
        state.console_enabled = true;
        state.file = None;
        state.file_enabled = state.open_file();
    }

    pub fn set_level(&self, level: LogLevel) {
        self.lock().min_level = level;
    }

    pub fn enable_console(&self, enabled: bool) {
        self.lock().console_enabled = enabled;
    }

    /// Enabling reopens the configured path when no file is open. If that
    /// fails the file sink stays disabled.
    pub fn enable_file(&self, enabled: bool) {
        let mut state = self.lock();
        if enabled && state.file.is_none() && !state.open_file() {
            state.file_enabled = false;
            return;
        }
        state.file_enabled = enabled;
    }

    pub fn level(&self) -> LogLevel {
        self.lock().min_level
    }

    pub fn console_enabled(&self) -> bool {
        self.lock().console_enabled
    }

    pub fn file_enabled(&self) -> bool {
        self.lock().file_enabled
    }

    pub fn file_path(&self) -> PathBuf {
        self.lock().file_path.clone()
    }

    /// Whether a record at `level` would currently be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.lock().accepts(level)
    }

    /// Write one record. `message` is only rendered when `level` passes the threshold.
    pub fn log(&self, level: LogLevel, message: impl fmt::Display, context: Option<&str>) {
        let mut state = self.lock();
        if state.accepts(level) {
            state.emit(level, &message, context);
        }
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message, None);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warning, message, None);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message, None);
    }

    pub fn debug_ctx(&self, message: impl fmt::Display, context: &str) {
        self.log(LogLevel::Debug, message, Some(context));
    }

    pub fn info_ctx(&self, message: impl fmt::Display, context: &str) {
        self.log(LogLevel::Info, message, Some(context));
    }

    pub fn warning_ctx(&self, message: impl fmt::Display, context: &str) {
        self.log(LogLevel::Warning, message, Some(context));
    }

    pub fn error_ctx(&self, message: impl fmt::Display, context: &str) {
        self.log(LogLevel::Error, message, Some(context));
    }

    /// One INFO record per served HTTP request.
    pub fn log_request(&self, ip: &str, method: &str, path: &str, status: u16, duration_ms: u128) {
        self.log(
            LogLevel::Info,
            RequestRecord { ip, method, path, status, duration_ms },
            None,
        );
    }

    /// One record per login attempt: INFO when it succeeded, WARNING otherwise.
    pub fn log_auth(&self, username: &str, success: bool, ip: &str, details: &str) {
        let level = if success { LogLevel::Info } else { LogLevel::Warning };
        self.log(level, AuthRecord { username, success, ip, details }, None);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

struct RequestRecord<'a> {
    ip: &'a str,
    method: &'a str,
    path: &'a str,
    status: u16,
    duration_ms: u128,
}

impl fmt::Display for RequestRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Request: {} {} | IP: {} | Status: {} | Duration: {}ms",
            self.method, self.path, self.ip, self.status, self.duration_ms
        )
    }
}

struct AuthRecord<'a> {
    username: &'a str,
    success: bool,
    ip: &'a str,
    details: &'a str,
}

impl fmt::Display for AuthRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Auth attempt: user='{}' success={} ip={}",
            self.username, self.success, self.ip
        )?;
        if !self.details.is_empty() {
            write!(f, " details={}", self.details)?;
        }
        Ok(())
    }
}
