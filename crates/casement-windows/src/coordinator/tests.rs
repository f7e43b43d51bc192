use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use casement_bus::{BusMessage, EventBus, SubscribeOptions, Topic};
use casement_common::{ContentError, LogicalKey, Rect, Size, WindowId};
use casement_config::schema::WindowsConfig;
use casement_log::{LogBackend, LogLevel, Logger};

use super::WindowCoordinator;
use crate::content::{ContentBuilder, WindowContent};
use crate::geometry::{ChromeMetrics, Panel, SharedChrome};
use crate::headless::{HeadlessHandle, HeadlessWidgets};
use crate::ipc::WindowStateEvent;
use crate::widget::WidgetHandle;

#[derive(Default)]
struct StubContent {
    fail: bool,
    calls: AtomicUsize,
}

impl StubContent {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContentBuilder for StubContent {
    async fn build(&self, key: &LogicalKey) -> Result<WindowContent, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ContentError::BuildFailed(format!("no card for {key}")));
        }
        Ok(WindowContent::new(key.clone(), format!("<section>{key}</section>")))
    }
}

struct Fixture {
    coordinator: WindowCoordinator,
    widgets: HeadlessWidgets,
    chrome: SharedChrome,
    backend: Arc<LogBackend>,
    events: Arc<Mutex<Vec<BusMessage>>>,
    content: StubContent,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(&WindowsConfig::default())
    }

    fn with_config(config: &WindowsConfig) -> Self {
        let widgets = HeadlessWidgets::new();
        let chrome = SharedChrome::new(ChromeMetrics {
            viewport: Size::new(1000.0, 800.0),
            top_panel_height: 40.0,
            bottom_panel_height: 60.0,
            top_panel_visible: true,
            bottom_panel_visible: true,
        });
        let backend = Arc::new(LogBackend::default());
        let log = Logger::new(Arc::clone(&backend), "shell");
        let bus = EventBus::default();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        bus.subscribe_all(SubscribeOptions::default(), move |ev| {
            sink.lock().unwrap().push(ev.payload.clone());
        });

        let coordinator = WindowCoordinator::new(
            Arc::new(widgets.clone()),
            bus,
            &log,
            Arc::new(chrome.clone()),
        )
        .with_config(config);

        Self {
            coordinator,
            widgets,
            chrome,
            backend,
            events,
            content: StubContent::default(),
        }
    }

    async fn open(&mut self, key: &str) -> WindowId {
        let title = key.to_uppercase();
        self.coordinator
            .open_or_focus(key, &title, None, &self.content)
            .await
            .unwrap()
    }

    fn handle(&self, id: &WindowId) -> Arc<HeadlessHandle> {
        self.widgets.handle(id).unwrap()
    }

    fn events(&self) -> Vec<BusMessage> {
        self.events.lock().unwrap().clone()
    }

    fn count_topic(&self, topic: Topic) -> usize {
        self.events().iter().filter(|m| m.topic() == topic).count()
    }

    fn focused_count(&self) -> usize {
        self.coordinator.registry().iter().filter(|e| e.focused).count()
    }

    fn warnings(&self) -> Vec<String> {
        self.backend
            .entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Warn)
            .map(|e| e.message)
            .collect()
    }
}

// -- open_or_focus --

#[tokio::test]
async fn repeated_open_yields_one_focused_entry() {
    let mut fx = Fixture::new();
    let first = fx.open("notes").await;
    let second = fx.open("notes").await;

    assert_eq!(first, second);
    assert_eq!(fx.coordinator.len(), 1);
    assert!(fx.coordinator.entry(&first).unwrap().focused);
    assert_eq!(fx.widgets.created_count(), 1);
    assert_eq!(fx.content.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fx.count_topic(Topic::WindowOpened), 1);
}

#[tokio::test]
async fn open_publishes_id_and_title() {
    let mut fx = Fixture::new();
    let id = fx.open("clock").await;
    assert_eq!(
        fx.events(),
        vec![BusMessage::WindowOpened {
            id,
            title: "CLOCK".into()
        }]
    );
}

#[tokio::test]
async fn opening_second_key_moves_focus() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let b = fx.open("b").await;

    assert_eq!(fx.focused_count(), 1);
    assert_eq!(fx.coordinator.focused_id(), Some(&b));
    assert!(!fx.coordinator.entry(&a).unwrap().focused);
}

#[tokio::test]
async fn reopening_minimized_key_restores_and_focuses() {
    let mut fx = Fixture::new();
    let id = fx.open("notes").await;
    fx.handle(&id).user_minimize();
    fx.coordinator.pump();
    assert!(fx.coordinator.entry(&id).unwrap().minimized);

    assert_eq!(fx.open("notes").await, id);

    let entry = fx.coordinator.entry(&id).unwrap();
    assert!(entry.focused && !entry.minimized);
    let commands = fx.handle(&id).commands();
    assert_eq!(&commands[commands.len() - 2..], ["restore", "focus"]);
}

#[tokio::test]
async fn reopening_still_focuses_when_restore_fails() {
    let mut fx = Fixture::new();
    let id = fx.open("notes").await;
    let _other = fx.open("clock").await;
    fx.handle(&id).user_minimize();
    fx.coordinator.pump();
    fx.handle(&id).fail_command("restore");

    assert_eq!(fx.open("notes").await, id);

    assert_eq!(fx.coordinator.focused_id(), Some(&id));
    assert_eq!(fx.focused_count(), 1);
    assert_eq!(fx.handle(&id).commands().last().map(String::as_str), Some("focus"));
    assert_eq!(fx.warnings(), vec!["widget command failed"]);
}

#[tokio::test]
async fn new_windows_cascade_inside_content_area() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let b = fx.open("b").await;

    let first = fx.coordinator.entry(&a).unwrap().bounds;
    let second = fx.coordinator.entry(&b).unwrap().bounds;
    assert_eq!(first, Rect::new(0.0, 40.0, 720.0, 480.0));
    assert_eq!(second, Rect::new(28.0, 68.0, 720.0, 480.0));
    assert_eq!(fx.handle(&b).bounds(), Some(second));
}

#[tokio::test]
async fn content_failure_registers_nothing() {
    let mut fx = Fixture::new();
    let failing = StubContent::failing();
    let result = fx
        .coordinator
        .open_or_focus("broken", "Broken", None, &failing)
        .await;

    assert!(result.is_none());
    assert!(fx.coordinator.is_empty());
    assert_eq!(fx.widgets.created_count(), 0);
    assert!(fx.events().is_empty());

    let errors: Vec<_> = fx
        .backend
        .entries()
        .into_iter()
        .filter(|e| e.level == LogLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].namespace, "shell.windows");
    assert!(errors[0].error.as_ref().unwrap().message.contains("no card for broken"));
}

#[tokio::test]
async fn widget_create_failure_registers_nothing() {
    let mut fx = Fixture::new();
    fx.widgets.fail_next_create();
    let result = fx
        .coordinator
        .open_or_focus("notes", "Notes", Some("pen"), &fx.content)
        .await;
    assert!(result.is_none());
    assert!(fx.coordinator.is_empty());
}

#[tokio::test]
async fn stale_widget_is_replaced_on_reopen() {
    let mut fx = Fixture::new();
    let old = fx.open("notes").await;
    fx.handle(&old).dispose_silently();

    let new = fx.open("notes").await;
    assert_ne!(old, new);
    assert_eq!(fx.coordinator.len(), 1);
    assert!(fx.coordinator.entry(&old).is_none());
    assert_eq!(fx.widgets.live_count(), 1);
}

#[tokio::test]
async fn icon_is_recorded() {
    let mut fx = Fixture::new();
    let id = fx
        .coordinator
        .open_or_focus("clock", "Clock", Some("clock-icon"), &fx.content)
        .await
        .unwrap();
    assert_eq!(fx.coordinator.entry(&id).unwrap().icon.as_deref(), Some("clock-icon"));
    assert_eq!(fx.handle(&id).icon(), Some("clock-icon"));
}

// -- activate --

#[tokio::test]
async fn activate_restores_focuses_and_maximizes() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let _b = fx.open("b").await;
    fx.handle(&a).user_minimize();
    fx.coordinator.pump();

    fx.coordinator.activate(&a);

    assert_eq!(fx.coordinator.focused_id(), Some(&a));
    assert_eq!(fx.focused_count(), 1);
    let commands = fx.handle(&a).commands();
    assert_eq!(&commands[commands.len() - 3..], ["restore", "focus", "maximize"]);
    assert!(fx.events().contains(&BusMessage::WindowFocused { id: a.clone() }));
}

#[tokio::test]
async fn maximize_reads_chrome_at_call_time() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    fx.chrome.set_panel_visible(Panel::Top, false);

    fx.coordinator.activate(&id);
    fx.coordinator.pump();

    assert_eq!(fx.handle(&id).bounds(), Some(Rect::new(0.0, 0.0, 1000.0, 740.0)));
    // Maximizing does not replace the normal geometry
    assert_eq!(
        fx.coordinator.entry(&id).unwrap().bounds,
        Rect::new(0.0, 40.0, 720.0, 480.0)
    );
}

#[tokio::test]
async fn activate_without_maximize_when_disabled() {
    let mut fx = Fixture::with_config(&WindowsConfig {
        maximize_on_activate: false,
        ..WindowsConfig::default()
    });
    let id = fx.open("a").await;
    fx.coordinator.activate(&id);
    assert!(!fx.handle(&id).commands().contains(&"maximize".to_string()));
    assert_eq!(fx.coordinator.focused_id(), Some(&id));
}

#[tokio::test]
async fn activate_disposed_widget_drops_entry() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    fx.handle(&id).dispose_silently();

    fx.coordinator.activate(&id);

    assert!(fx.coordinator.is_empty());
    assert_eq!(fx.warnings(), vec!["widget disposed; dropping stale window"]);
    assert_eq!(fx.count_topic(Topic::WindowFocused), 0);
    assert!(fx.events().contains(&BusMessage::WindowClosed { id }));
}

#[tokio::test]
async fn activate_unknown_id_is_noop() {
    let mut fx = Fixture::new();
    fx.open("a").await;
    fx.coordinator.activate(&WindowId::from("nope"));
    assert_eq!(fx.coordinator.len(), 1);
    assert!(fx.warnings().is_empty());
}

#[tokio::test]
async fn failed_command_keeps_live_entry() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let b = fx.open("b").await;
    fx.handle(&a).fail_commands(true);

    fx.coordinator.activate(&a);

    assert_eq!(fx.coordinator.len(), 2);
    assert_eq!(fx.coordinator.focused_id(), Some(&b));
    assert_eq!(fx.warnings(), vec!["widget command failed"]);
}

#[tokio::test]
async fn activate_key_looks_up_by_key() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    fx.open("b").await;
    assert!(fx.coordinator.activate_key(&LogicalKey::from("a")));
    assert!(!fx.coordinator.activate_key(&LogicalKey::from("zzz")));
    assert_eq!(fx.coordinator.focused_id(), Some(&a));
}

// -- minimize_all / close_all --

#[tokio::test]
async fn minimize_all_minimizes_and_unfocuses_everything() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let b = fx.open("b").await;
    fx.handle(&a).user_minimize();
    fx.coordinator.pump();

    let count = fx.coordinator.minimize_all();

    assert_eq!(count, 2);
    assert!(fx
        .coordinator
        .registry()
        .iter()
        .all(|e| e.minimized && !e.focused));
    assert!(fx.handle(&b).is_minimized());
    // Already-minimized widgets are not minimized twice
    let a_minimizes = fx
        .handle(&a)
        .commands()
        .iter()
        .filter(|c| *c == "minimize")
        .count();
    assert_eq!(a_minimizes, 1);
    assert_eq!(
        fx.events().last(),
        Some(&BusMessage::HomeSelected { count: 2 })
    );
}

#[tokio::test]
async fn subscribers_see_whole_batch() {
    let mut fx = Fixture::new();
    fx.open("a").await;
    fx.open("b").await;

    let seen = Arc::new(Mutex::new(None));
    let probe = Arc::clone(&seen);
    fx.coordinator.bus().subscribe(
        Topic::HomeSelected,
        SubscribeOptions::default(),
        move |ev| {
            *probe.lock().unwrap() = Some(ev.payload.clone());
        },
    );

    fx.coordinator.minimize_all();
    assert_eq!(
        *seen.lock().unwrap(),
        Some(BusMessage::HomeSelected { count: 2 })
    );
}

#[tokio::test]
async fn minimize_all_on_empty_registry() {
    let mut fx = Fixture::new();
    assert_eq!(fx.coordinator.minimize_all(), 0);
    assert_eq!(fx.events(), vec![BusMessage::HomeSelected { count: 0 }]);
}

#[tokio::test]
async fn close_all_empties_registry_and_ignores_late_callbacks() {
    let mut fx = Fixture::new();
    fx.open("a").await;
    fx.open("b").await;

    assert_eq!(fx.coordinator.close_all(), 2);
    assert!(fx.coordinator.is_empty());
    assert_eq!(fx.widgets.live_count(), 0);

    // The widgets' close hooks fired during close_all and are still queued
    assert_eq!(fx.coordinator.pending_callbacks(), 2);
    fx.coordinator.pump();

    assert!(fx.coordinator.is_empty());
    assert_eq!(fx.count_topic(Topic::WindowClosed), 0);
}

#[tokio::test]
async fn reopen_after_close_all_gets_fresh_id() {
    let mut fx = Fixture::new();
    let old = fx.open("a").await;
    fx.coordinator.close_all();
    let new = fx.open("a").await;
    assert_ne!(old, new);
    assert_eq!(fx.coordinator.len(), 1);
}

// -- reconciliation --

#[tokio::test]
async fn hooks_do_not_touch_registry_until_pumped() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    fx.handle(&id).user_minimize();

    assert!(!fx.coordinator.entry(&id).unwrap().minimized);
    assert_eq!(fx.coordinator.pending_callbacks(), 1);

    assert_eq!(fx.coordinator.pump(), 1);
    assert!(fx.coordinator.entry(&id).unwrap().minimized);
    assert_eq!(fx.count_topic(Topic::WindowMinimized), 1);
}

#[tokio::test]
async fn user_close_removes_entry_and_publishes() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    fx.handle(&id).user_close();
    fx.coordinator.pump();

    assert!(fx.coordinator.is_empty());
    assert!(fx.events().contains(&BusMessage::WindowClosed { id }));
}

#[tokio::test]
async fn on_close_never_vetoes() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    assert!(fx.coordinator.on_close(&id));
    assert!(fx.coordinator.on_close(&id));
    assert_eq!(fx.count_topic(Topic::WindowClosed), 1);
}

#[tokio::test]
async fn callback_overrides_optimistic_state() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    fx.coordinator.minimize_all();
    fx.coordinator.pump();

    fx.handle(&id).user_focus();
    fx.coordinator.pump();

    let entry = fx.coordinator.entry(&id).unwrap();
    assert!(entry.focused && !entry.minimized);
}

#[tokio::test]
async fn restore_reapplies_clamped_layout() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    fx.chrome.set_viewport(Size::new(600.0, 500.0));

    fx.handle(&id).user_minimize();
    fx.handle(&id).user_restore();
    fx.coordinator.pump();

    let expected = Rect::new(0.0, 40.0, 600.0, 400.0);
    assert_eq!(fx.coordinator.entry(&id).unwrap().bounds, expected);
    assert_eq!(fx.handle(&id).bounds(), Some(expected));
    assert_eq!(fx.count_topic(Topic::WindowRestored), 1);
}

#[tokio::test]
async fn focus_callback_keeps_single_focus() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let b = fx.open("b").await;
    let c = fx.open("c").await;

    for id in [&a, &c, &b] {
        fx.handle(id).user_focus();
        fx.coordinator.pump();
        assert_eq!(fx.focused_count(), 1);
        assert_eq!(fx.coordinator.focused_id(), Some(id));
    }
}

#[tokio::test]
async fn ipc_blur_clears_focus() {
    let mut fx = Fixture::new();
    let id = fx.open("a").await;
    let raw = format!(
        r#"{{"window_id":"{id}","state":"blurred","title":"A","timestamp":"2026-01-01T00:00:00Z"}}"#
    );
    let event = WindowStateEvent::parse(&raw).unwrap();
    fx.coordinator.callback_queue().push(event.to_callback());
    fx.coordinator.pump();

    assert!(fx.coordinator.focused_id().is_none());
    assert_eq!(fx.coordinator.len(), 1);
}

#[tokio::test]
async fn callbacks_for_unknown_windows_are_ignored() {
    let mut fx = Fixture::new();
    let ghost = WindowId::from("ghost");
    fx.coordinator.on_focus(&ghost);
    fx.coordinator.on_minimize(&ghost);
    fx.coordinator.on_restore(&ghost);
    fx.coordinator.on_maximize(&ghost);
    assert!(fx.coordinator.on_close(&ghost));
    assert!(fx.events().is_empty());
}

// -- end to end --

#[tokio::test]
async fn open_activate_minimize_all_scenario() {
    let mut fx = Fixture::new();
    let a = fx.open("a").await;
    let b = fx.open("b").await;
    fx.coordinator.activate(&a);
    fx.coordinator.pump();

    let count = fx.coordinator.minimize_all();
    fx.coordinator.pump();

    assert_eq!(count, 2);
    for id in [&a, &b] {
        let entry = fx.coordinator.entry(id).unwrap();
        assert!(entry.minimized);
        assert!(!entry.focused);
    }
    assert_eq!(fx.focused_count(), 0);
}

#[tokio::test]
async fn snapshot_lists_entries_in_open_order() {
    let mut fx = Fixture::new();
    fx.open("a").await;
    fx.open("b").await;
    let snapshot = fx.coordinator.snapshot();
    let keys: Vec<&str> = snapshot.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b"]);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json[1]["focused"], true);
}
