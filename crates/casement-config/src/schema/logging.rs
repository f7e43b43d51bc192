//! Structured logger configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Severity of a log entry. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level name case-insensitively. Unknown names map to `Info`;
    /// `trace` folds into `Debug` and `warning` into `Warn`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" | "fatal" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level that is recorded.
    pub level: LogLevel,
    /// Master switch; when false every log call is a no-op.
    pub enabled: bool,
    /// In-memory ring buffer size (valid range: 1-100000).
    pub max_entries: usize,
    /// Strings in context longer than this are truncated (valid range: 16-65536).
    pub max_string_length: usize,
    /// Nesting depth after which context values are cut (valid range: 1-32).
    pub max_depth: usize,
    /// Context keys containing any of these words (case-insensitive) are redacted.
    pub redact_keys: Vec<String>,
    /// Also scrub inline secrets (bearer tokens, api keys) from string values.
    pub scrub_secret_patterns: bool,
    /// Append entries as JSON lines to this file. No file output when unset.
    pub file: Option<PathBuf>,
    /// Rotate the log file once it reaches this many bytes (valid range: 1 KiB-1 GiB).
    pub max_file_size: u64,
    /// Rotated files kept as `<file>.1` .. `<file>.N` (valid range: 0-100).
    pub max_backups: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            enabled: true,
            max_entries: 500,
            max_string_length: 1000,
            max_depth: 6,
            redact_keys: default_redact_keys(),
            scrub_secret_patterns: true,
            file: None,
            max_file_size: 10 * 1024 * 1024,
            max_backups: 5,
        }
    }
}

pub fn default_redact_keys() -> Vec<String> {
    [
        "password",
        "token",
        "secret",
        "authorization",
        "cookie",
        "api_key",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
