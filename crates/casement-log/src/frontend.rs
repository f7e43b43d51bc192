//! Log records forwarded from window content over IPC.

use std::sync::Arc;

use casement_common::IpcError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::logger::Logger;
use crate::LogLevel;

/// A log record posted by a content surface.
///
/// ```json
/// { "message": "rendered", "level": "info", "category": "clock",
///   "meta": { "ms": 4 }, "sessionId": "abc", "frontendTimestamp": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendLogEntry {
    pub message: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "sessionId", alias = "session_id")]
    pub session_id: Option<String>,
    #[serde(default, rename = "frontendTimestamp", alias = "frontend_timestamp")]
    pub frontend_timestamp: Option<String>,
}

impl FrontendLogEntry {
    pub fn parse(raw: &str) -> Result<Self, IpcError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn level(&self) -> LogLevel {
        self.level
            .as_deref()
            .map(LogLevel::parse_lenient)
            .unwrap_or_default()
    }

    /// Record this entry in `logger`'s backend under `frontend.<category>`,
    /// whatever namespace `logger` itself carries. Returns the entry id
    /// unless filtered.
    pub fn ingest(self, logger: &Logger) -> Option<u64> {
        let level = self.level();
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("general");
        let scoped = Logger::new(Arc::clone(logger.backend()), "frontend")
            .child(category, Value::Null);

        let mut context = match self.meta {
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                let mut map = Map::new();
                map.insert("meta".into(), other);
                map
            }
        };
        if let Some(session) = self.session_id {
            context.insert("sessionId".into(), Value::String(session));
        }
        if let Some(ts) = self.frontend_timestamp {
            context.insert("frontendTimestamp".into(), Value::String(ts));
        }

        scoped.log(level, &self.message, Value::Object(context), None)
    }
}
