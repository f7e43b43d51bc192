//! Shell chrome dimensions and window placement.

use std::sync::{Arc, RwLock};

use casement_common::{Rect, Size};
use casement_config::schema::{ChromeConfig, WindowsConfig};
use serde::{Deserialize, Serialize};

/// Current viewport and panel state of the shell chrome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromeMetrics {
    pub viewport: Size,
    pub top_panel_height: f64,
    pub bottom_panel_height: f64,
    pub top_panel_visible: bool,
    pub bottom_panel_visible: bool,
}

impl ChromeMetrics {
    pub fn from_config(config: &ChromeConfig) -> Self {
        Self {
            viewport: Size::new(config.viewport_width, config.viewport_height),
            top_panel_height: config.top_panel_height,
            bottom_panel_height: config.bottom_panel_height,
            top_panel_visible: config.top_panel_visible,
            bottom_panel_visible: config.bottom_panel_visible,
        }
    }

    /// The area between the visible panels. Never negative.
    pub fn content_area(&self) -> Rect {
        let top = if self.top_panel_visible {
            self.top_panel_height
        } else {
            0.0
        };
        let bottom = if self.bottom_panel_visible {
            self.bottom_panel_height
        } else {
            0.0
        };
        Rect::new(
            0.0,
            top,
            self.viewport.width.max(0.0),
            (self.viewport.height - top - bottom).max(0.0),
        )
    }
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self::from_config(&ChromeConfig::default())
    }
}

/// Source of chrome dimensions, read fresh whenever a window is maximized
/// or restored.
pub trait ChromeProvider: Send + Sync {
    fn metrics(&self) -> ChromeMetrics;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Top,
    Bottom,
}

/// Chrome state shared between the shell and the coordinator.
#[derive(Debug, Clone, Default)]
pub struct SharedChrome {
    metrics: Arc<RwLock<ChromeMetrics>>,
}

impl SharedChrome {
    pub fn new(metrics: ChromeMetrics) -> Self {
        Self {
            metrics: Arc::new(RwLock::new(metrics)),
        }
    }

    pub fn set_panel_visible(&self, panel: Panel, visible: bool) {
        let mut metrics = self.metrics.write().unwrap_or_else(|e| e.into_inner());
        match panel {
            Panel::Top => metrics.top_panel_visible = visible,
            Panel::Bottom => metrics.bottom_panel_visible = visible,
        }
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.metrics
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .viewport = viewport;
    }
}

impl ChromeProvider for SharedChrome {
    fn metrics(&self) -> ChromeMetrics {
        *self.metrics.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChromeProvider for ChromeMetrics {
    fn metrics(&self) -> ChromeMetrics {
        *self
    }
}

/// Where new windows go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPolicy {
    pub default_size: Size,
    pub cascade_offset: f64,
}

impl LayoutPolicy {
    pub fn from_config(config: &WindowsConfig) -> Self {
        Self {
            default_size: Size::new(config.default_width, config.default_height),
            cascade_offset: config.cascade_offset,
        }
    }

    /// Bounds for the `index`-th open window: a cascade from the top-left
    /// of `area`, wrapping back to the origin when it would run off the edge.
    pub fn initial_bounds(&self, index: usize, area: &Rect) -> Rect {
        let width = self.default_size.width.min(area.width);
        let height = self.default_size.height.min(area.height);
        let room_x = (area.width - width).max(0.0);
        let room_y = (area.height - height).max(0.0);

        let steps = if self.cascade_offset > 0.0 {
            // Float-to-int casts saturate, so a tiny offset caps at usize::MAX.
            let fit = ((room_x.min(room_y) / self.cascade_offset).floor() as usize)
                .saturating_add(1);
            index % fit
        } else {
            0
        };
        let offset = steps as f64 * self.cascade_offset;

        Rect::new(area.x + offset, area.y + offset, width, height).clamp_into(area)
    }
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self::from_config(&WindowsConfig::default())
    }
}
