use casement_common::WindowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every topic the shell publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "window:opened")]
    WindowOpened,
    #[serde(rename = "window:focused")]
    WindowFocused,
    #[serde(rename = "window:minimized")]
    WindowMinimized,
    #[serde(rename = "window:restored")]
    WindowRestored,
    #[serde(rename = "window:closed")]
    WindowClosed,
    #[serde(rename = "window:home-selected")]
    HomeSelected,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::WindowOpened,
        Topic::WindowFocused,
        Topic::WindowMinimized,
        Topic::WindowRestored,
        Topic::WindowClosed,
        Topic::HomeSelected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::WindowOpened => "window:opened",
            Topic::WindowFocused => "window:focused",
            Topic::WindowMinimized => "window:minimized",
            Topic::WindowRestored => "window:restored",
            Topic::WindowClosed => "window:closed",
            Topic::HomeSelected => "window:home-selected",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}

/// Payload of a bus event. One variant per [`Topic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum BusMessage {
    #[serde(rename = "window:opened")]
    WindowOpened { id: WindowId, title: String },
    #[serde(rename = "window:focused")]
    WindowFocused { id: WindowId },
    #[serde(rename = "window:minimized")]
    WindowMinimized { id: WindowId },
    #[serde(rename = "window:restored")]
    WindowRestored { id: WindowId },
    #[serde(rename = "window:closed")]
    WindowClosed { id: WindowId },
    #[serde(rename = "window:home-selected")]
    HomeSelected { count: usize },
}

impl BusMessage {
    pub fn topic(&self) -> Topic {
        match self {
            BusMessage::WindowOpened { .. } => Topic::WindowOpened,
            BusMessage::WindowFocused { .. } => Topic::WindowFocused,
            BusMessage::WindowMinimized { .. } => Topic::WindowMinimized,
            BusMessage::WindowRestored { .. } => Topic::WindowRestored,
            BusMessage::WindowClosed { .. } => Topic::WindowClosed,
            BusMessage::HomeSelected { .. } => Topic::HomeSelected,
        }
    }

    /// The window this message is about, if it concerns a single window.
    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            BusMessage::WindowOpened { id, .. }
            | BusMessage::WindowFocused { id }
            | BusMessage::WindowMinimized { id }
            | BusMessage::WindowRestored { id }
            | BusMessage::WindowClosed { id } => Some(id),
            BusMessage::HomeSelected { .. } => None,
        }
    }
}

/// A published message stamped with its topic, bus-wide sequence number
/// and publish time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    pub sequence: u64,
    pub topic: Topic,
    pub payload: BusMessage,
    pub timestamp: DateTime<Utc>,
}

impl BusEvent {
    pub(crate) fn stamp(sequence: u64, payload: BusMessage) -> Self {
        Self {
            sequence,
            topic: payload.topic(),
            payload,
            timestamp: Utc::now(),
        }
    }
}
