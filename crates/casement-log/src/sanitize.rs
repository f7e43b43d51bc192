//! Context redaction applied to every entry before it is stored or emitted.

use std::sync::LazyLock;

use casement_config::schema::LoggingConfig;
use regex::Regex;
use serde_json::{Map, Value};

use crate::entry::NormalizedError;

pub const REDACTED: &str = "[REDACTED]";
pub const MAX_DEPTH_MARKER: &str = "[MaxDepth]";
pub const TRUNCATION_SUFFIX: &str = "...[truncated]";

/// Inline secret patterns scrubbed from string values. More specific
/// patterns first; the generic `key=value` form last.
static SECRET_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"AKIA[0-9A-Z]{16}", "[REDACTED]"),
        (r"sk_(?:live|test)_[a-zA-Z0-9]+", "[REDACTED]"),
        (r"sk-[a-zA-Z0-9]{20,}", "[REDACTED]"),
        (r"gh[pos]_[a-zA-Z0-9]{20,}", "[REDACTED]"),
        (r"Bearer [a-zA-Z0-9._\-]+", "Bearer [REDACTED]"),
        (
            r"(?i)((?:api_key|key|token|secret|password)=)[^\s&;]+",
            "${1}[REDACTED]",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Replace inline secrets in `input` with redaction markers.
pub fn scrub_secrets(input: &str) -> String {
    let mut result = input.to_string();
    for (re, replacement) in SECRET_PATTERNS.iter() {
        if re.is_match(&result) {
            result = re.replace_all(&result, *replacement).into_owned();
        }
    }
    result
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
    redact_keys: Vec<String>,
    max_string_length: usize,
    max_depth: usize,
    scrub_patterns: bool,
}

impl Sanitizer {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            redact_keys: config
                .redact_keys
                .iter()
                .map(|k| k.trim().to_ascii_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            max_string_length: config.max_string_length,
            max_depth: config.max_depth,
            scrub_patterns: config.scrub_secret_patterns,
        }
    }

    /// True when `key` contains any configured redaction word, ignoring case.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.redact_keys.iter().any(|word| key.contains(word.as_str()))
    }

    /// Sanitize a top-level context map. Its values sit at depth 1.
    pub fn sanitize_context(&self, context: Map<String, Value>) -> Map<String, Value> {
        context
            .into_iter()
            .map(|(key, value)| {
                let value = self.sanitize_field(&key, value, 1);
                (key, value)
            })
            .collect()
    }

    /// Sanitize the message and stack of an error passed alongside a log call.
    pub fn sanitize_error(&self, error: NormalizedError) -> NormalizedError {
        NormalizedError {
            name: error.name,
            message: self.clean_string(error.message),
            stack: error.stack.map(|s| self.clean_string(s)),
        }
    }

    fn sanitize_field(&self, key: &str, value: Value, depth: usize) -> Value {
        if self.is_sensitive(key) {
            Value::String(REDACTED.to_string())
        } else {
            self.sanitize_value(value, depth)
        }
    }

    fn sanitize_value(&self, value: Value, depth: usize) -> Value {
        if depth > self.max_depth {
            return Value::String(MAX_DEPTH_MARKER.to_string());
        }

        match value {
            Value::String(s) => Value::String(self.clean_string(s)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.sanitize_value(item, depth + 1))
                    .collect(),
            ),
            Value::Object(map) => match NormalizedError::from_json(&map) {
                Some(error) => self.sanitize_error(error).to_value(),
                None => Value::Object(
                    map.into_iter()
                        .map(|(key, value)| {
                            let value = self.sanitize_field(&key, value, depth + 1);
                            (key, value)
                        })
                        .collect(),
                ),
            },
            other => other,
        }
    }

    fn clean_string(&self, s: String) -> String {
        let s = if self.scrub_patterns {
            scrub_secrets(&s)
        } else {
            s
        };

        match s.char_indices().nth(self.max_string_length) {
            Some((cut, _)) => format!("{}{TRUNCATION_SUFFIX}", &s[..cut]),
            None => s,
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::from_config(&LoggingConfig::default())
    }
}
