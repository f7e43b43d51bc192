//! The WindowCoordinator owns the window registry and keeps it in step with
//! the widget library.

mod operations;
mod reconcile;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use casement_bus::{BusMessage, EventBus};
use casement_common::{LogicalKey, WindowId};
use casement_config::schema::WindowsConfig;
use casement_log::Logger;
use serde_json::json;

use crate::entry::{Registry, WindowEntry};
use crate::geometry::{ChromeProvider, LayoutPolicy};
use crate::widget::{CallbackQueue, WidgetCallback, WidgetHandle, WidgetLibrary};

/// Upper bound on drain rounds in one [`WindowCoordinator::pump`] call.
const MAX_PUMP_ROUNDS: usize = 64;

/// Authoritative view of the open content windows.
///
/// User intent arrives through [`open_or_focus`](Self::open_or_focus),
/// [`activate`](Self::activate), [`minimize_all`](Self::minimize_all) and
/// [`close_all`](Self::close_all). Widget hooks only enqueue callbacks; the
/// host loop applies them with [`pump`](Self::pump).
pub struct WindowCoordinator {
    pub(super) library: Arc<dyn WidgetLibrary>,
    pub(super) bus: EventBus,
    pub(super) log: Logger,
    pub(super) chrome: Arc<dyn ChromeProvider>,
    pub(super) layout: LayoutPolicy,
    pub(super) maximize_on_activate: bool,
    pub(super) registry: Registry,
    pub(super) handles: HashMap<WindowId, Arc<dyn WidgetHandle>>,
    pub(super) queue: CallbackQueue,
}

impl WindowCoordinator {
    pub fn new(
        library: Arc<dyn WidgetLibrary>,
        bus: EventBus,
        log: &Logger,
        chrome: Arc<dyn ChromeProvider>,
    ) -> Self {
        Self {
            library,
            bus,
            log: log.child("windows", json!({})),
            chrome,
            layout: LayoutPolicy::default(),
            maximize_on_activate: true,
            registry: Registry::new(),
            handles: HashMap::new(),
            queue: CallbackQueue::new(),
        }
    }

    /// Apply the `[windows]` config section.
    pub fn with_config(mut self, config: &WindowsConfig) -> Self {
        self.layout = LayoutPolicy::from_config(config);
        self.maximize_on_activate = config.maximize_on_activate;
        self
    }

    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    // -- Accessors --

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn entry(&self, id: &WindowId) -> Option<&WindowEntry> {
        self.registry.get(id)
    }

    pub fn entry_by_key(&self, key: &LogicalKey) -> Option<&WindowEntry> {
        self.registry.find_by_key(key)
    }

    pub fn focused_id(&self) -> Option<&WindowId> {
        self.registry.focused().map(|e| &e.id)
    }

    /// Serializable copy of the registry, in open order.
    pub fn snapshot(&self) -> Vec<WindowEntry> {
        self.registry.snapshot()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The queue widget hooks push into. IPC reports go here too.
    pub fn callback_queue(&self) -> CallbackQueue {
        self.queue.clone()
    }

    pub fn pending_callbacks(&self) -> usize {
        self.queue.len()
    }

    // -- Callback dispatch --

    /// Drain and apply queued widget callbacks. Callbacks enqueued while
    /// applying are handled in the same call. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let batch = self.queue.drain();
            if batch.is_empty() {
                return handled;
            }
            for callback in batch {
                self.dispatch(callback);
                handled += 1;
            }
        }
        self.log.warn(
            "callback queue did not settle",
            json!({ "handled": handled, "pending": self.queue.len() }),
        );
        handled
    }

    /// Apply one callback immediately.
    pub fn dispatch(&mut self, callback: WidgetCallback) {
        match callback {
            WidgetCallback::Focus(id) => self.on_focus(&id),
            WidgetCallback::Blur(id) => self.on_blur(&id),
            WidgetCallback::Minimize(id) => self.on_minimize(&id),
            WidgetCallback::Restore(id) => self.on_restore(&id),
            WidgetCallback::Maximize(id) => self.on_maximize(&id),
            WidgetCallback::Close(id) => {
                self.on_close(&id);
            }
        }
    }

    // -- Internals shared by operations and reconciliation --

    pub(super) fn publish(&self, message: BusMessage) {
        self.bus.publish(message);
    }

    /// The handle for `id` if it is still alive. A missing or disposed
    /// handle drops the entry as stale.
    pub(super) fn live_handle(&mut self, id: &WindowId) -> Option<Arc<dyn WidgetHandle>> {
        match self.handles.get(id) {
            Some(handle) if !handle.is_disposed() => Some(Arc::clone(handle)),
            Some(_) => {
                self.log
                    .warn("widget disposed; dropping stale window", json!({ "id": id }));
                self.drop_stale(id);
                None
            }
            None if self.registry.contains(id) => {
                self.log
                    .warn("no widget for window; dropping stale window", json!({ "id": id }));
                self.drop_stale(id);
                None
            }
            None => {
                self.log.debug("unknown window", json!({ "id": id }));
                None
            }
        }
    }

    /// Run one widget command. A disposed widget drops the entry; any other
    /// failure is logged and the entry kept. Returns whether it succeeded.
    pub(super) fn command<F>(&mut self, id: &WindowId, name: &str, f: F) -> bool
    where
        F: FnOnce(&dyn WidgetHandle) -> crate::widget::Result<()>,
    {
        let Some(handle) = self.live_handle(id) else {
            return false;
        };
        match f(handle.as_ref()) {
            Ok(()) => true,
            Err(err) => {
                let disposed = handle.is_disposed()
                    || matches!(err, casement_common::WidgetError::Disposed(_));
                self.log.warn(
                    "widget command failed",
                    json!({ "id": id, "command": name, "error": err.to_string(), "stale": disposed }),
                );
                if disposed {
                    self.drop_stale(id);
                }
                false
            }
        }
    }

    /// Forget a window whose widget is gone and tell subscribers it closed.
    pub(super) fn drop_stale(&mut self, id: &WindowId) {
        self.handles.remove(id);
        if self.registry.remove(id).is_some() {
            self.publish(BusMessage::WindowClosed { id: id.clone() });
        }
    }
}
