//! User-intent operations: open, activate, minimize all, close all.

use casement_bus::BusMessage;
use casement_common::{LogicalKey, WindowId};
use serde_json::json;

use crate::content::ContentBuilder;
use crate::entry::WindowEntry;
use crate::widget::{CreateOptions, LifecycleHooks};

use super::WindowCoordinator;

impl WindowCoordinator {
    /// Focus the window open for `key`, or build and open a new one.
    ///
    /// Returns the window id, or `None` when content construction or widget
    /// creation failed. At most one window exists per key.
    pub async fn open_or_focus(
        &mut self,
        key: impl Into<LogicalKey>,
        title: &str,
        icon: Option<&str>,
        builder: &dyn ContentBuilder,
    ) -> Option<WindowId> {
        let key = key.into();

        if let Some((id, minimized)) = self
            .registry
            .find_by_key(&key)
            .map(|e| (e.id.clone(), e.minimized))
        {
            self.bring_forward(&id, minimized);
            if self.registry.contains(&id) {
                return Some(id);
            }
            // The widget was stale and has been dropped; open a fresh one.
        }

        let content = match builder.build(&key).await {
            Ok(content) => content,
            Err(err) => {
                self.log.error_with(
                    "content construction failed",
                    json!({ "key": key, "title": title }),
                    &err,
                );
                return None;
            }
        };

        let id = WindowId::new();
        let area = self.chrome.metrics().content_area();
        let bounds = self.layout.initial_bounds(self.registry.len(), &area);

        let options = CreateOptions {
            id: id.clone(),
            title: title.to_string(),
            icon: icon.map(str::to_string),
            bounds,
            content,
            hooks: LifecycleHooks::queued(id.clone(), self.queue.clone()),
        };
        let handle = match self.library.create(options) {
            Ok(handle) => handle,
            Err(err) => {
                self.log.error_with(
                    "widget creation failed",
                    json!({ "key": key, "title": title }),
                    &err,
                );
                return None;
            }
        };

        self.handles.insert(id.clone(), handle);
        self.registry.insert_focused(WindowEntry {
            id: id.clone(),
            key: key.clone(),
            title: title.to_string(),
            icon: icon.map(str::to_string),
            minimized: false,
            focused: true,
            bounds,
        });
        self.log.info(
            "window opened",
            json!({ "id": id, "key": key, "title": title }),
        );
        self.publish(BusMessage::WindowOpened {
            id: id.clone(),
            title: title.to_string(),
        });
        Some(id)
    }

    /// Restore (if needed) and focus an existing window.
    fn bring_forward(&mut self, id: &WindowId, minimized: bool) {
        if minimized {
            // Focus is attempted either way; a stale widget is dropped here.
            self.command(id, "restore", |h| h.restore());
        }
        if self.command(id, "focus", |h| h.focus()) {
            self.registry.focus_only(id);
        }
    }

    /// Bring a window to the front: restore if minimized, focus, maximize.
    /// Unknown or stale windows are dropped silently.
    pub fn activate(&mut self, id: &WindowId) {
        let Some(handle) = self.live_handle(id) else {
            return;
        };

        if handle.is_minimized() && !self.command(id, "restore", |h| h.restore()) {
            return;
        }
        if !self.command(id, "focus", |h| h.focus()) {
            return;
        }
        if self.maximize_on_activate && !self.command(id, "maximize", |h| h.maximize()) {
            return;
        }

        if self.registry.focus_only(id) {
            self.log.debug("window activated", json!({ "id": id }));
            self.publish(BusMessage::WindowFocused { id: id.clone() });
        }
    }

    /// Activate the window open for `key`, if any.
    pub fn activate_key(&mut self, key: &LogicalKey) -> bool {
        match self.registry.find_by_key(key).map(|e| e.id.clone()) {
            Some(id) => {
                self.activate(&id);
                true
            }
            None => false,
        }
    }

    /// Minimize every window ("show desktop"). Returns how many windows were
    /// tracked before the call.
    pub fn minimize_all(&mut self) -> usize {
        let count = self.registry.len();
        let ids: Vec<WindowId> = self.registry.iter().map(|e| e.id.clone()).collect();

        let mut stale = Vec::new();
        for id in &ids {
            match self.handles.get(id) {
                Some(handle) if !handle.is_disposed() => {
                    if handle.is_minimized() {
                        continue;
                    }
                    if let Err(err) = handle.minimize() {
                        self.log.warn(
                            "widget command failed",
                            json!({ "id": id, "command": "minimize", "error": err.to_string() }),
                        );
                        if handle.is_disposed() {
                            stale.push(id.clone());
                        }
                    }
                }
                _ => stale.push(id.clone()),
            }
        }

        self.registry.minimize_all();
        for id in &stale {
            self.log
                .warn("widget disposed; dropping stale window", json!({ "id": id }));
            self.drop_stale(id);
        }

        self.log.info("all windows minimized", json!({ "count": count }));
        self.publish(BusMessage::HomeSelected { count });
        count
    }

    /// Close every window and empty the registry at once. Close callbacks
    /// that arrive afterwards are ignored. Returns how many were removed.
    pub fn close_all(&mut self) -> usize {
        let removed = self.registry.take_all();
        let handles: Vec<_> = self.handles.drain().collect();

        for (id, handle) in handles {
            if handle.is_disposed() {
                continue;
            }
            if let Err(err) = handle.close() {
                self.log.warn(
                    "widget command failed",
                    json!({ "id": id, "command": "close", "error": err.to_string() }),
                );
            }
        }

        self.log
            .info("all windows closed", json!({ "count": removed.len() }));
        removed.len()
    }
}
