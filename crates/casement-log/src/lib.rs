//! Namespaced, redacting structured logger.
//!
//! A [`LogBackend`] owns the level filter, the sanitizer, a bounded ring
//! buffer of recent [`LogEntry`] values and the list of sinks, such as a
//! rotating JSON-lines [`FileSink`]. [`Logger`] handles are cheap views onto
//! a backend with a namespace and a base context; [`Logger::child`] derives
//! narrower ones that share the backend.
//!
//! ```rust
//! use std::sync::Arc;
//! use casement_config::schema::LoggingConfig;
//! use casement_log::{LogBackend, Logger};
//! use serde_json::json;
//!
//! let backend = Arc::new(LogBackend::new(&LoggingConfig::default()));
//! let log = Logger::new(backend.clone(), "shell").child("windows", json!({}));
//! log.info("opened", json!({ "password": "hunter2" }));
//!
//! let entry = &backend.entries()[0];
//! assert_eq!(entry.namespace, "shell.windows");
//! assert_eq!(entry.context["password"], "[REDACTED]");
//! ```

pub mod backend;
pub mod entry;
pub mod file_sink;
pub mod frontend;
pub mod logger;
pub mod sanitize;
pub mod sink;

pub use backend::LogBackend;
pub use casement_config::schema::LogLevel;
pub use entry::{LogEntry, NormalizedError};
pub use file_sink::FileSink;
pub use frontend::FrontendLogEntry;
pub use logger::Logger;
pub use sanitize::{Sanitizer, MAX_DEPTH_MARKER, REDACTED};
pub use sink::{Sink, SinkId};
