//! Content window placement defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    /// Initial window width in pixels (valid range: 120-8192).
    pub default_width: f64,
    /// Initial window height in pixels (valid range: 80-8192).
    pub default_height: f64,
    /// Offset applied per already-open window when cascading (valid range: 0-200).
    pub cascade_offset: f64,
    /// Maximize a window when it is activated from the window list.
    pub maximize_on_activate: bool,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            default_width: 720.0,
            default_height: 480.0,
            cascade_offset: 28.0,
            maximize_on_activate: true,
        }
    }
}
