use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::LogLevel;

/// A finalized log record, as stored in the ring buffer and handed to sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub level: LogLevel,
    pub namespace: String,
    pub message: String,
    pub context: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<NormalizedError>,
}

/// Error details reduced to plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
}

impl NormalizedError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Capture a Rust error: the short type name, its message, and the
    /// `source()` chain as the stack.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: short_type_name::<E>(),
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }

    /// Recognize an error-shaped JSON object: a string `message` plus either
    /// a `stack` field or a `name` ending in "Error".
    pub(crate) fn from_json(map: &Map<String, Value>) -> Option<Self> {
        let message = map.get("message")?.as_str()?;
        let name = map.get("name").and_then(Value::as_str);
        let has_stack = map.contains_key("stack");
        if !has_stack && !name.is_some_and(|n| n.ends_with("Error")) {
            return None;
        }

        Some(Self {
            name: name.unwrap_or("Error").to_string(),
            message: message.to_string(),
            stack: map.get("stack").and_then(Value::as_str).map(str::to_string),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("message".into(), Value::String(self.message.clone()));
        map.insert(
            "stack".into(),
            self.stack.clone().map_or(Value::Null, Value::String),
        );
        Value::Object(map)
    }
}

fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "content fetch failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn from_error_captures_name_message_and_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "socket closed"));
        let normalized = NormalizedError::from_error(&err);
        assert_eq!(normalized.name, "Outer");
        assert_eq!(normalized.message, "content fetch failed");
        assert_eq!(normalized.stack.as_deref(), Some("caused by: socket closed"));
    }

    #[test]
    fn from_error_without_source_has_no_stack() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let normalized = NormalizedError::from_error(&err);
        assert_eq!(normalized.name, "Error");
        assert!(normalized.stack.is_none());
    }

    #[test]
    fn error_like_json_is_recognized() {
        let value = json!({ "name": "TypeError", "message": "x is undefined", "extra": 1 });
        let normalized = NormalizedError::from_json(value.as_object().unwrap()).unwrap();
        assert_eq!(normalized.name, "TypeError");
        assert_eq!(normalized.message, "x is undefined");

        let with_stack = json!({ "message": "boom", "stack": "at f (a.js:1)" });
        let normalized = NormalizedError::from_json(with_stack.as_object().unwrap()).unwrap();
        assert_eq!(normalized.name, "Error");
        assert_eq!(normalized.stack.as_deref(), Some("at f (a.js:1)"));
    }

    #[test]
    fn plain_objects_are_not_errors() {
        let value = json!({ "name": "notes", "message": "hello" });
        assert!(NormalizedError::from_json(value.as_object().unwrap()).is_none());
    }

    #[test]
    fn entry_serializes_without_empty_error() {
        let entry = LogEntry {
            id: 1,
            timestamp: "2026-01-01T00:00:00.000Z".into(),
            level: LogLevel::Info,
            namespace: "shell".into(),
            message: "hi".into(),
            context: Map::new(),
            error: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "info");
        assert!(json.get("error").is_none());
    }
}
