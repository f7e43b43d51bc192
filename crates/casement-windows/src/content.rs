//! What goes inside a window.

use async_trait::async_trait;
use casement_common::{ContentError, LogicalKey};

/// Rendered content handed to the widget library at create time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowContent {
    pub key: LogicalKey,
    /// Markup mounted into the widget's body.
    pub body: String,
}

impl WindowContent {
    pub fn new(key: LogicalKey, body: impl Into<String>) -> Self {
        Self {
            key,
            body: body.into(),
        }
    }
}

/// Produces the content for a logical key. This is the one suspension point
/// in opening a window; it must resolve before the window is registered.
#[async_trait]
pub trait ContentBuilder: Send + Sync {
    async fn build(&self, key: &LogicalKey) -> Result<WindowContent, ContentError>;
}
