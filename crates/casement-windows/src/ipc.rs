//! `window_state_change` messages posted by window content.

use casement_common::{IpcError, WindowId};
use serde::{Deserialize, Serialize};

use crate::widget::WidgetCallback;

/// IPC kind under which window content reports state changes.
pub const WINDOW_STATE_CHANGE: &str = "window_state_change";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Focused,
    Blurred,
    Minimized,
    Maximized,
    Restored,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStateEvent {
    pub window_id: WindowId,
    pub state: WindowState,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub timestamp: String,
}

impl WindowStateEvent {
    pub fn parse(raw: &str) -> Result<Self, IpcError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The lifecycle callback this report corresponds to.
    pub fn to_callback(&self) -> WidgetCallback {
        let id = self.window_id.clone();
        match self.state {
            WindowState::Focused => WidgetCallback::Focus(id),
            WindowState::Blurred => WidgetCallback::Blur(id),
            WindowState::Minimized => WidgetCallback::Minimize(id),
            WindowState::Maximized => WidgetCallback::Maximize(id),
            WindowState::Restored => WidgetCallback::Restore(id),
            WindowState::Closed => WidgetCallback::Close(id),
        }
    }
}
