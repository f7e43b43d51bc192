//! In-memory widget library for tests and the demo binary.
//!
//! Handles behave like real floating widgets: commands mutate their state
//! and fire the matching lifecycle hook, a confirmed close disposes the
//! handle, and any command on a disposed handle fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use casement_common::{Rect, WidgetError, WindowId};

use crate::content::WindowContent;
use crate::widget::{CreateOptions, LifecycleHooks, Result, WidgetHandle, WidgetLibrary};

#[derive(Debug, Clone, Default)]
struct HandleState {
    minimized: bool,
    maximized: bool,
    disposed: bool,
    bounds: Option<Rect>,
    commands: Vec<String>,
}

pub struct HeadlessHandle {
    id: WindowId,
    title: String,
    icon: Option<String>,
    content: WindowContent,
    hooks: LifecycleHooks,
    state: Mutex<HandleState>,
    fail_commands: AtomicBool,
    failing: Mutex<Vec<String>>,
}

impl HeadlessHandle {
    fn new(options: CreateOptions) -> Self {
        Self {
            id: options.id,
            title: options.title,
            icon: options.icon,
            content: options.content,
            hooks: options.hooks,
            state: Mutex::new(HandleState {
                bounds: Some(options.bounds),
                ..HandleState::default()
            }),
            fail_commands: AtomicBool::new(false),
            failing: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn content(&self) -> &WindowContent {
        &self.content
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.state().bounds
    }

    pub fn is_maximized(&self) -> bool {
        self.state().maximized
    }

    /// Every command accepted so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    /// Make every later command fail with [`WidgetError::CommandFailed`].
    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    /// Make only the named command fail from now on.
    pub fn fail_command(&self, command: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command.to_string());
    }

    /// Tear the widget down without firing any hook, as when the library
    /// drops an instance behind the shell's back.
    pub fn dispose_silently(&self) {
        self.state().disposed = true;
    }

    /// The user clicked the widget.
    pub fn user_focus(&self) {
        if !self.is_disposed() {
            (self.hooks.on_focus)();
        }
    }

    /// Focus moved elsewhere.
    pub fn user_blur(&self) {
        if !self.is_disposed() {
            (self.hooks.on_blur)();
        }
    }

    pub fn user_minimize(&self) {
        let _ = self.minimize();
    }

    pub fn user_restore(&self) {
        let _ = self.restore();
    }

    pub fn user_close(&self) {
        let _ = self.close();
    }

    fn state(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record `command` and apply `f` to the state, or fail if disposed.
    fn apply(&self, command: &str, f: impl FnOnce(&mut HandleState)) -> Result<()> {
        let singled_out = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|c| c == command);
        if singled_out || self.fail_commands.load(Ordering::SeqCst) {
            return Err(WidgetError::CommandFailed {
                command: command.to_string(),
                reason: "simulated failure".into(),
            });
        }
        let mut state = self.state();
        if state.disposed {
            return Err(WidgetError::Disposed(self.id.to_string()));
        }
        state.commands.push(command.to_string());
        f(&mut state);
        Ok(())
    }
}

impl WidgetHandle for HeadlessHandle {
    fn focus(&self) -> Result<()> {
        self.apply("focus", |_| {})?;
        (self.hooks.on_focus)();
        Ok(())
    }

    fn minimize(&self) -> Result<()> {
        self.apply("minimize", |s| s.minimized = true)?;
        (self.hooks.on_minimize)();
        Ok(())
    }

    fn restore(&self) -> Result<()> {
        self.apply("restore", |s| {
            s.minimized = false;
            s.maximized = false;
        })?;
        (self.hooks.on_restore)();
        Ok(())
    }

    fn maximize(&self) -> Result<()> {
        self.apply("maximize", |s| {
            s.minimized = false;
            s.maximized = true;
        })?;
        (self.hooks.on_maximize)();
        Ok(())
    }

    fn resize(&self, width: f64, height: f64) -> Result<()> {
        self.apply("resize", |s| {
            let b = s.bounds.get_or_insert(Rect::new(0.0, 0.0, 0.0, 0.0));
            b.width = width;
            b.height = height;
        })
    }

    fn move_to(&self, x: f64, y: f64) -> Result<()> {
        self.apply("move", |s| {
            let b = s.bounds.get_or_insert(Rect::new(0.0, 0.0, 0.0, 0.0));
            b.x = x;
            b.y = y;
        })
    }

    fn close(&self) -> Result<()> {
        self.apply("close", |_| {})?;
        if (self.hooks.on_close)() {
            self.state().disposed = true;
        }
        Ok(())
    }

    fn is_minimized(&self) -> bool {
        self.state().minimized
    }

    fn is_disposed(&self) -> bool {
        self.state().disposed
    }
}

/// A [`WidgetLibrary`] that keeps its widgets in memory.
#[derive(Clone, Default)]
pub struct HeadlessWidgets {
    handles: Arc<Mutex<Vec<Arc<HeadlessHandle>>>>,
    fail_next_create: Arc<AtomicBool>,
}

impl HeadlessWidgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every widget ever created, including disposed ones.
    pub fn handles(&self) -> Vec<Arc<HeadlessHandle>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn handle(&self, id: &WindowId) -> Option<Arc<HeadlessHandle>> {
        self.handles().into_iter().find(|h| h.id() == id)
    }

    /// The most recent live widget with this title.
    pub fn find_by_title(&self, title: &str) -> Option<Arc<HeadlessHandle>> {
        self.handles()
            .into_iter()
            .rev()
            .find(|h| h.title() == title && !h.is_disposed())
    }

    pub fn live_count(&self) -> usize {
        self.handles().iter().filter(|h| !h.is_disposed()).count()
    }

    pub fn created_count(&self) -> usize {
        self.handles.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Make the next `create` call fail.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }
}

impl WidgetLibrary for HeadlessWidgets {
    fn create(&self, options: CreateOptions) -> Result<Arc<dyn WidgetHandle>> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(WidgetError::CreateFailed(format!(
                "refused to create '{}'",
                options.title
            )));
        }
        let handle = Arc::new(HeadlessHandle::new(options));
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&handle));
        Ok(handle)
    }
}
