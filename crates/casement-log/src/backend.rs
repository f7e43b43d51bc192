//! Shared logger state: level filter, sanitizer, ring buffer and sinks.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use casement_config::schema::LoggingConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::entry::{LogEntry, NormalizedError};
use crate::sanitize::Sanitizer;
use crate::sink::{console_sink, Sink, SinkId};
use crate::LogLevel;

#[derive(Debug, Clone, Copy)]
struct Settings {
    min_level: LogLevel,
    enabled: bool,
    max_entries: usize,
}

struct Ring {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

/// Backend shared by a root [`Logger`](crate::Logger) and all its children.
pub struct LogBackend {
    settings: RwLock<Settings>,
    sanitizer: Sanitizer,
    ring: Mutex<Ring>,
    console: Sink,
    sinks: RwLock<Vec<(SinkId, Sink)>>,
    next_sink: AtomicU64,
}

impl LogBackend {
    pub fn new(config: &LoggingConfig) -> Self {
        let max_entries = config.max_entries.max(1);
        Self {
            settings: RwLock::new(Settings {
                min_level: config.level,
                enabled: config.enabled,
                max_entries,
            }),
            sanitizer: Sanitizer::from_config(config),
            ring: Mutex::new(Ring {
                entries: VecDeque::with_capacity(max_entries.min(1024)),
                next_id: 1,
            }),
            console: Arc::new(console_sink),
            sinks: RwLock::new(Vec::new()),
            next_sink: AtomicU64::new(1),
        }
    }

    /// Whether a call at `level` would be recorded.
    pub fn enabled_for(&self, level: LogLevel) -> bool {
        let settings = self.settings();
        settings.enabled && level >= settings.min_level
    }

    pub fn min_level(&self) -> LogLevel {
        self.settings().min_level
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.settings.write().unwrap_or_else(|e| e.into_inner()).min_level = level;
    }

    pub fn is_enabled(&self) -> bool {
        self.settings().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.settings.write().unwrap_or_else(|e| e.into_inner()).enabled = enabled;
    }

    pub fn max_entries(&self) -> usize {
        self.settings().max_entries
    }

    /// Change the buffer bound, evicting the oldest entries if it shrank.
    pub fn set_max_entries(&self, max_entries: usize) {
        let max_entries = max_entries.max(1);
        self.settings.write().unwrap_or_else(|e| e.into_inner()).max_entries = max_entries;
        let mut ring = self.ring();
        while ring.entries.len() > max_entries {
            ring.entries.pop_front();
        }
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Register an additional sink. Sinks run in registration order after
    /// the console sink.
    pub fn add_sink<F>(&self, sink: F) -> SinkId
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        let id = SinkId(self.next_sink.fetch_add(1, Ordering::SeqCst));
        self.sinks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(sink)));
        id
    }

    /// Remove a sink. Returns `false` if it was already gone.
    pub fn remove_sink(&self, id: SinkId) -> bool {
        let mut sinks = self.sinks.write().unwrap_or_else(|e| e.into_inner());
        let before = sinks.len();
        sinks.retain(|(sid, _)| *sid != id);
        sinks.len() != before
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Snapshot of the buffer, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.ring().entries.iter().cloned().collect()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let ring = self.ring();
        let skip = ring.entries.len().saturating_sub(n);
        ring.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ring().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring().entries.is_empty()
    }

    /// Empty the buffer. Ids keep increasing afterwards.
    pub fn clear(&self) {
        self.ring().entries.clear();
    }

    /// Sanitize, stamp, buffer and fan out one entry. Callers have already
    /// checked [`enabled_for`](Self::enabled_for).
    pub(crate) fn emit(
        &self,
        level: LogLevel,
        namespace: &str,
        message: &str,
        context: Map<String, Value>,
        error: Option<NormalizedError>,
    ) -> u64 {
        let context = self.sanitizer.sanitize_context(context);
        let error = error.map(|e| self.sanitizer.sanitize_error(e));
        let max_entries = self.max_entries();

        let entry = {
            let mut ring = self.ring();
            let entry = LogEntry {
                id: ring.next_id,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                level,
                namespace: namespace.to_string(),
                message: message.to_string(),
                context,
                error,
            };
            ring.next_id += 1;
            while ring.entries.len() >= max_entries {
                ring.entries.pop_front();
            }
            ring.entries.push_back(entry.clone());
            entry
        };

        let sinks: Vec<Sink> = std::iter::once(Arc::clone(&self.console))
            .chain(
                self.sinks
                    .read()
                    .unwrap_or_else(|e| e.into_inner())
                    .iter()
                    .map(|(_, s)| Arc::clone(s)),
            )
            .collect();

        for sink in &sinks {
            if panic::catch_unwind(AssertUnwindSafe(|| sink(&entry))).is_err() {
                tracing::error!(target: "casement", entry = entry.id, "log sink panicked");
            }
        }

        entry.id
    }

    fn settings(&self) -> Settings {
        *self.settings.read().unwrap_or_else(|e| e.into_inner())
    }

    fn ring(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for LogBackend {
    fn default() -> Self {
        Self::new(&LoggingConfig::default())
    }
}
