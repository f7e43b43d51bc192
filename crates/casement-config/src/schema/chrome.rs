//! Shell chrome geometry: the viewport and the top/bottom panels that
//! bound the area content windows may occupy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Viewport width in pixels (valid range: 320-16384).
    pub viewport_width: f64,
    /// Viewport height in pixels (valid range: 240-16384).
    pub viewport_height: f64,
    /// Top panel height in pixels (valid range: 0-400).
    pub top_panel_height: f64,
    /// Bottom panel (taskbar) height in pixels (valid range: 0-400).
    pub bottom_panel_height: f64,
    pub top_panel_visible: bool,
    pub bottom_panel_visible: bool,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            top_panel_height: 40.0,
            bottom_panel_height: 48.0,
            top_panel_visible: true,
            bottom_panel_visible: true,
        }
    }
}
