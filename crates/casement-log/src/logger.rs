use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::backend::LogBackend;
use crate::entry::NormalizedError;
use crate::LogLevel;

/// A namespaced view onto a [`LogBackend`] with a base context merged into
/// every entry. Cloning is cheap.
#[derive(Clone)]
pub struct Logger {
    backend: Arc<LogBackend>,
    namespace: String,
    base: Map<String, Value>,
}

impl Logger {
    pub fn new(backend: Arc<LogBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            base: Map::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &Arc<LogBackend> {
        &self.backend
    }

    pub fn base_context(&self) -> &Map<String, Value> {
        &self.base
    }

    /// Derive a logger whose namespace is `self.namespace + "." + scope` and
    /// whose base context is this one's merged with `context` (child wins).
    /// An empty scope keeps the namespace.
    pub fn child(&self, scope: &str, context: Value) -> Logger {
        let namespace = match (self.namespace.is_empty(), scope.is_empty()) {
            (_, true) => self.namespace.clone(),
            (true, false) => scope.to_string(),
            (false, false) => format!("{}.{}", self.namespace, scope),
        };

        let mut base = self.base.clone();
        base.extend(into_map(context));

        Logger {
            backend: Arc::clone(&self.backend),
            namespace,
            base,
        }
    }

    /// Record one entry. Returns the entry id, or `None` when the call was
    /// filtered by level or the backend is disabled.
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        context: Value,
        error: Option<NormalizedError>,
    ) -> Option<u64> {
        if !self.backend.enabled_for(level) {
            return None;
        }

        let mut merged = self.base.clone();
        merged.extend(into_map(context));
        Some(
            self.backend
                .emit(level, &self.namespace, message, merged, error),
        )
    }

    pub fn debug(&self, message: &str, context: Value) -> Option<u64> {
        self.log(LogLevel::Debug, message, context, None)
    }

    pub fn info(&self, message: &str, context: Value) -> Option<u64> {
        self.log(LogLevel::Info, message, context, None)
    }

    pub fn warn(&self, message: &str, context: Value) -> Option<u64> {
        self.log(LogLevel::Warn, message, context, None)
    }

    pub fn error(&self, message: &str, context: Value) -> Option<u64> {
        self.log(LogLevel::Error, message, context, None)
    }

    /// Log at error level with a Rust error attached.
    pub fn error_with<E>(&self, message: &str, context: Value, err: &E) -> Option<u64>
    where
        E: std::error::Error + ?Sized,
    {
        if !self.backend.enabled_for(LogLevel::Error) {
            return None;
        }
        self.log(
            LogLevel::Error,
            message,
            context,
            Some(NormalizedError::from_error(err)),
        )
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("base", &self.base)
            .finish()
    }
}

/// Objects are used as-is; null means no context; anything else is kept
/// under a `value` key.
fn into_map(context: Value) -> Map<String, Value> {
    match context {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".into(), other);
            map
        }
    }
}
