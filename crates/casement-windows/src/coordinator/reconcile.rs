//! Widget callbacks applied back onto the registry. Callbacks report the
//! physical state and overwrite any optimistic update.

use casement_bus::BusMessage;
use casement_common::WindowId;
use serde_json::json;

use super::WindowCoordinator;

impl WindowCoordinator {
    pub fn on_focus(&mut self, id: &WindowId) {
        if self.registry.focus_only(id) {
            self.log.debug("window focused", json!({ "id": id }));
            self.publish(BusMessage::WindowFocused { id: id.clone() });
        } else {
            self.ignore("focus", id);
        }
    }

    /// Focus left the window. No bus topic covers this.
    pub fn on_blur(&mut self, id: &WindowId) {
        if self.registry.blur(id) {
            self.log.debug("window blurred", json!({ "id": id }));
        } else {
            self.ignore("blur", id);
        }
    }

    pub fn on_minimize(&mut self, id: &WindowId) {
        if self.registry.set_minimized(id, true) {
            self.log.debug("window minimized", json!({ "id": id }));
            self.publish(BusMessage::WindowMinimized { id: id.clone() });
        } else {
            self.ignore("minimize", id);
        }
    }

    /// Mark the window visible again and put it back at its last normal
    /// geometry, clamped into the current content area.
    pub fn on_restore(&mut self, id: &WindowId) {
        if !self.registry.set_minimized(id, false) {
            self.ignore("restore", id);
            return;
        }
        self.log.debug("window restored", json!({ "id": id }));
        self.publish(BusMessage::WindowRestored { id: id.clone() });

        let area = self.chrome.metrics().content_area();
        let Some(bounds) = self.registry.get_mut(id).map(|entry| {
            entry.bounds = entry.bounds.clamp_into(&area);
            entry.bounds
        }) else {
            return;
        };
        if self.command(id, "move", |h| h.move_to(bounds.x, bounds.y)) {
            self.command(id, "resize", |h| h.resize(bounds.width, bounds.height));
        }
    }

    /// Fill the content area between the panels, read at call time.
    pub fn on_maximize(&mut self, id: &WindowId) {
        if !self.registry.contains(id) {
            self.ignore("maximize", id);
            return;
        }
        let area = self.chrome.metrics().content_area();
        self.log.debug(
            "window maximized",
            json!({ "id": id, "area": { "x": area.x, "y": area.y, "width": area.width, "height": area.height } }),
        );
        if self.command(id, "move", |h| h.move_to(area.x, area.y)) {
            self.command(id, "resize", |h| h.resize(area.width, area.height));
        }
    }

    /// The widget closed. Never vetoes.
    pub fn on_close(&mut self, id: &WindowId) -> bool {
        self.handles.remove(id);
        match self.registry.remove(id) {
            Some(entry) => {
                self.log.info(
                    "window closed",
                    json!({ "id": id, "key": entry.key, "title": entry.title }),
                );
                self.publish(BusMessage::WindowClosed { id: id.clone() });
            }
            None => self.ignore("close", id),
        }
        true
    }

    fn ignore(&self, callback: &str, id: &WindowId) {
        self.log.debug(
            "callback for untracked window ignored",
            json!({ "callback": callback, "id": id }),
        );
    }
}
