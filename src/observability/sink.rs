//! Log line formatting and the console/file write primitives.
//!
//! Nothing in here locks or filters; the [`Logger`](super::Logger) serializes
//! every call so each line reaches its destinations whole.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown log level '{0}' (expected debug, info, warning or error)")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, ParseLevelError> {
        value.parse()
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warning,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// Render one record as `[YYYY-MM-DD HH:MM:SS.mmm] [LEVEL] message [context]`.
///
/// The context suffix is only appended when it is present and non-empty.
pub fn format_line(
    timestamp: &NaiveDateTime,
    level: LogLevel,
    message: &dyn fmt::Display,
    context: Option<&str>,
) -> String {
    let mut line = format!(
        "[{}] [{}] {}",
        timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        level,
        message
    );
    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        line.push_str(" [");
        line.push_str(ctx);
        line.push(']');
    }
    line
}

/// Errors go to stderr, everything else to stdout. Flushed per line.
pub fn write_console(level: LogLevel, line: &str) {
    if level == LogLevel::Error {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{}", line);
        let _ = err.flush();
    } else {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Append the line to the open file, if any, and flush it.
pub fn write_file(file: Option<&mut File>, line: &str) {
    if let Some(file) = file {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        let _ = file.write_all(buf.as_bytes());
        let _ = file.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_milli_opt(9, 5, 1, ms)
            .unwrap()
    }

    #[test]
    fn test_format_without_context() {
        let line = format_line(&ts(42), LogLevel::Info, &"x", None);
        assert_eq!(line, "[2024-03-07 09:05:01.042] [INFO] x");

        let empty = format_line(&ts(42), LogLevel::Info, &"x", Some(""));
        assert_eq!(empty, line);
    }

    #[test]
    fn test_format_with_context() {
        let line = format_line(&ts(999), LogLevel::Warning, &"x", Some("ctx"));
        assert_eq!(line, "[2024-03-07 09:05:01.999] [WARNING] x [ctx]");
    }

    #[test]
    fn test_millis_zero_padded() {
        let line = format_line(&ts(7), LogLevel::Debug, &"y", None);
        assert!(line.starts_with("[2024-03-07 09:05:01.007] [DEBUG]"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" Error ".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("trace".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_from_string() {
        assert_eq!(LogLevel::try_from("Info".to_string()).unwrap(), LogLevel::Info);
        let err = LogLevel::try_from("loud".to_string()).unwrap_err();
        assert!(err.to_string().contains("'loud'"));
    }

    #[test]
    fn test_write_file_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.log");
        let mut file = File::create(&path).unwrap();

        write_file(Some(&mut file), "first");
        write_file(Some(&mut file), "second");
        write_file(None, "dropped");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
