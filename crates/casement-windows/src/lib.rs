//! Window session coordination for the casement shell.
//!
//! [`WindowCoordinator`] owns the authoritative registry of open content
//! windows. It drives an external floating-window library through the
//! [`WidgetLibrary`]/[`WidgetHandle`] traits, reconciles the library's
//! lifecycle callbacks back into the registry, and reports every transition
//! on the [`EventBus`](casement_bus::EventBus) and the structured logger.

pub mod content;
pub mod coordinator;
pub mod entry;
pub mod geometry;
pub mod headless;
pub mod ipc;
pub mod observe;
pub mod widget;

pub use content::{ContentBuilder, WindowContent};
pub use coordinator::WindowCoordinator;
pub use entry::{Registry, WindowEntry};
pub use geometry::{ChromeMetrics, ChromeProvider, LayoutPolicy, Panel, SharedChrome};
pub use headless::{HeadlessHandle, HeadlessWidgets};
pub use ipc::{WindowState, WindowStateEvent};
pub use observe::bridge_bus_to_logger;
pub use widget::{
    CallbackQueue, CreateOptions, LifecycleHooks, WidgetCallback, WidgetHandle, WidgetLibrary,
};
