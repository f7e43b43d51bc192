//! The narrow contract the coordinator needs from a floating-window library.

use std::sync::{Arc, Mutex, MutexGuard};

use casement_common::{Rect, WidgetError, WindowId};
use serde::{Deserialize, Serialize};

use crate::content::WindowContent;

pub type Result<T> = std::result::Result<T, WidgetError>;

/// Controls one live widget. Every command fails with
/// [`WidgetError::Disposed`] once the widget has been torn down.
pub trait WidgetHandle: Send + Sync {
    fn focus(&self) -> Result<()>;
    fn minimize(&self) -> Result<()>;
    fn restore(&self) -> Result<()>;
    fn maximize(&self) -> Result<()>;
    fn resize(&self, width: f64, height: f64) -> Result<()>;
    fn move_to(&self, x: f64, y: f64) -> Result<()>;
    fn close(&self) -> Result<()>;
    fn is_minimized(&self) -> bool;
    fn is_disposed(&self) -> bool;
}

/// Creates widgets.
pub trait WidgetLibrary: Send + Sync {
    fn create(&self, options: CreateOptions) -> Result<Arc<dyn WidgetHandle>>;
}

pub struct CreateOptions {
    pub id: WindowId,
    pub title: String,
    pub icon: Option<String>,
    pub bounds: Rect,
    pub content: WindowContent,
    pub hooks: LifecycleHooks,
}

/// A lifecycle notification from the widget library, tagged with the window
/// it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum WidgetCallback {
    Focus(WindowId),
    Blur(WindowId),
    Minimize(WindowId),
    Restore(WindowId),
    Maximize(WindowId),
    Close(WindowId),
}

impl WidgetCallback {
    pub fn window_id(&self) -> &WindowId {
        match self {
            WidgetCallback::Focus(id)
            | WidgetCallback::Blur(id)
            | WidgetCallback::Minimize(id)
            | WidgetCallback::Restore(id)
            | WidgetCallback::Maximize(id)
            | WidgetCallback::Close(id) => id,
        }
    }
}

/// Pending callbacks, pushed by widget hooks and drained by
/// [`WindowCoordinator::pump`](crate::WindowCoordinator::pump).
#[derive(Debug, Clone, Default)]
pub struct CallbackQueue {
    pending: Arc<Mutex<Vec<WidgetCallback>>>,
}

impl CallbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, callback: WidgetCallback) {
        self.lock().push(callback);
    }

    /// Take every pending callback, oldest first.
    pub fn drain(&self) -> Vec<WidgetCallback> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A hook that panicked mid-push leaves the Vec intact; keep using it.
    fn lock(&self) -> MutexGuard<'_, Vec<WidgetCallback>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Hook = Arc<dyn Fn() + Send + Sync>;
type CloseHook = Arc<dyn Fn() -> bool + Send + Sync>;

/// Callbacks a widget invokes on its own lifecycle changes.
#[derive(Clone)]
pub struct LifecycleHooks {
    pub on_focus: Hook,
    pub on_blur: Hook,
    pub on_minimize: Hook,
    pub on_restore: Hook,
    pub on_maximize: Hook,
    /// Returning `false` would veto the close.
    pub on_close: CloseHook,
}

impl LifecycleHooks {
    /// Hooks that enqueue a [`WidgetCallback`] for `id` and never veto a close.
    pub fn queued(id: WindowId, queue: CallbackQueue) -> Self {
        let hook = |make: fn(WindowId) -> WidgetCallback| -> Hook {
            let id = id.clone();
            let queue = queue.clone();
            Arc::new(move || queue.push(make(id.clone())))
        };

        let close_id = id.clone();
        let close_queue = queue.clone();
        Self {
            on_focus: hook(WidgetCallback::Focus),
            on_blur: hook(WidgetCallback::Blur),
            on_minimize: hook(WidgetCallback::Minimize),
            on_restore: hook(WidgetCallback::Restore),
            on_maximize: hook(WidgetCallback::Maximize),
            on_close: Arc::new(move || {
                close_queue.push(WidgetCallback::Close(close_id.clone()));
                true
            }),
        }
    }

    /// Hooks that do nothing.
    pub fn noop() -> Self {
        Self {
            on_focus: Arc::new(|| {}),
            on_blur: Arc::new(|| {}),
            on_minimize: Arc::new(|| {}),
            on_restore: Arc::new(|| {}),
            on_maximize: Arc::new(|| {}),
            on_close: Arc::new(|| true),
        }
    }
}

impl std::fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooks").finish_non_exhaustive()
    }
}
