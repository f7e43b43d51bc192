//! Log sinks: functions that receive every finalized entry.

use std::sync::Arc;

use serde_json::Value;

use crate::entry::LogEntry;
use crate::LogLevel;

/// A sink receives each entry after it has been sanitized and buffered.
pub type Sink = Arc<dyn Fn(&LogEntry) + Send + Sync>;

/// Handle for removing a sink added with [`LogBackend::add_sink`](crate::LogBackend::add_sink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(pub(crate) u64);

/// The always-present console sink: forwards entries to `tracing`.
pub fn console_sink(entry: &LogEntry) {
    let context = Value::Object(entry.context.clone());
    let error = entry
        .error
        .as_ref()
        .map(|e| format!("{}: {}", e.name, e.message))
        .unwrap_or_default();

    match entry.level {
        LogLevel::Debug => tracing::debug!(
            target: "casement",
            id = entry.id,
            namespace = %entry.namespace,
            context = %context,
            "{}", entry.message
        ),
        LogLevel::Info => tracing::info!(
            target: "casement",
            id = entry.id,
            namespace = %entry.namespace,
            context = %context,
            "{}", entry.message
        ),
        LogLevel::Warn => tracing::warn!(
            target: "casement",
            id = entry.id,
            namespace = %entry.namespace,
            context = %context,
            "{}", entry.message
        ),
        LogLevel::Error => tracing::error!(
            target: "casement",
            id = entry.id,
            namespace = %entry.namespace,
            context = %context,
            error = %error,
            "{}", entry.message
        ),
    }
}
