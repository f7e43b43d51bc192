//! Wires config, logger, bus and coordinator into one session.

use std::sync::Arc;

use casement_bus::{EventBus, Subscription};
use casement_common::{CasementError, IpcError, LogicalKey};
use casement_config::schema::CasementConfig;
use casement_log::{FileSink, FrontendLogEntry, LogBackend, LogEntry, Logger};
use casement_windows::ipc::WINDOW_STATE_CHANGE;
use casement_windows::{
    bridge_bus_to_logger, ChromeMetrics, HeadlessHandle, HeadlessWidgets, SharedChrome,
    WindowCoordinator, WindowEntry, WindowStateEvent,
};
use serde_json::json;

use crate::content::DemoContent;
use crate::script::Command;

/// IPC kind for log records posted by window content.
pub const LOG_MESSAGE: &str = "log_message";

pub struct Shell {
    backend: Arc<LogBackend>,
    log: Logger,
    bus: EventBus,
    chrome: SharedChrome,
    widgets: HeadlessWidgets,
    coordinator: WindowCoordinator,
    content: DemoContent,
    _bridge: Vec<Subscription>,
}

impl Shell {
    pub fn new(config: &CasementConfig) -> Self {
        let backend = Arc::new(LogBackend::new(&config.logging));
        let log = Logger::new(Arc::clone(&backend), "shell");
        match FileSink::from_config(&config.logging) {
            Ok(Some(sink)) => {
                backend.add_sink(sink.into_sink());
            }
            Ok(None) => {}
            Err(err) => {
                log.warn(
                    "log file unavailable",
                    json!({ "path": config.logging.file, "error": err.to_string() }),
                );
            }
        }
        let bus = EventBus::new(config.bus.replay_capacity);
        let bridge = bridge_bus_to_logger(&bus, &log);
        let chrome = SharedChrome::new(ChromeMetrics::from_config(&config.chrome));
        let widgets = HeadlessWidgets::new();
        let coordinator = WindowCoordinator::new(
            Arc::new(widgets.clone()),
            bus.clone(),
            &log,
            Arc::new(chrome.clone()),
        )
        .with_config(&config.windows);

        Self {
            backend,
            log,
            bus,
            chrome,
            widgets,
            coordinator,
            content: DemoContent,
            _bridge: bridge,
        }
    }

    pub fn coordinator(&self) -> &WindowCoordinator {
        &self.coordinator
    }

    pub fn backend(&self) -> &Arc<LogBackend> {
        &self.backend
    }

    /// Run one command and return the lines to print.
    pub async fn execute(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Open { key, title } => {
                let icon = DemoContent::icon(&key);
                match self
                    .coordinator
                    .open_or_focus(key.as_str(), &title, icon, &self.content)
                    .await
                {
                    Some(id) => vec![format!("{key}: {id}")],
                    None => vec![format!("{key}: failed to open")],
                }
            }
            Command::Activate { key } => {
                if self.coordinator.activate_key(&LogicalKey::from(key.as_str())) {
                    vec![format!("{key}: activated")]
                } else {
                    vec![format!("{key}: not open")]
                }
            }
            Command::MinimizeAll => {
                vec![format!("minimized {}", self.coordinator.minimize_all())]
            }
            Command::CloseAll => vec![format!("closed {}", self.coordinator.close_all())],
            Command::Pump => vec![format!("applied {}", self.coordinator.pump())],
            Command::List => {
                let entries = self.coordinator.snapshot();
                if entries.is_empty() {
                    return vec!["(no windows)".to_string()];
                }
                entries.iter().map(format_entry).collect()
            }
            Command::Logs { count } => self.backend.recent(count).iter().map(format_log).collect(),
            Command::History { topic } => self
                .bus
                .history(topic, None)
                .into_iter()
                .map(|ev| {
                    let payload = serde_json::to_string(&ev.payload).unwrap_or_default();
                    format!("#{} {} {}", ev.sequence, ev.topic, payload)
                })
                .collect(),
            Command::UserMinimize { key } => self.user_action(&key, |h| h.user_minimize()),
            Command::UserRestore { key } => self.user_action(&key, |h| h.user_restore()),
            Command::UserClose { key } => self.user_action(&key, |h| h.user_close()),
            Command::Panel { panel, visible } => {
                self.chrome.set_panel_visible(panel, visible);
                self.log
                    .info("panel toggled", json!({ "panel": format!("{panel:?}"), "visible": visible }));
                vec![format!("panel {panel:?} {}", if visible { "on" } else { "off" })]
            }
            Command::Ipc { kind, payload } => match self.handle_ipc(&kind, &payload) {
                Ok(()) => vec![format!("ipc {kind}: accepted")],
                Err(err) => vec![format!("ipc {kind}: {err}")],
            },
        }
    }

    /// Route a message posted by window content.
    pub fn handle_ipc(&mut self, kind: &str, payload: &str) -> Result<(), CasementError> {
        match kind {
            LOG_MESSAGE => {
                FrontendLogEntry::parse(payload)?.ingest(&self.log);
                Ok(())
            }
            WINDOW_STATE_CHANGE => {
                let event = WindowStateEvent::parse(payload)?;
                self.coordinator.callback_queue().push(event.to_callback());
                Ok(())
            }
            other => Err(IpcError::UnknownKind(other.to_string()).into()),
        }
    }

    /// Simulate the user acting on a widget directly, bypassing the
    /// coordinator. The resulting callback waits for the next `pump`.
    fn user_action(&self, key: &str, action: impl FnOnce(&HeadlessHandle)) -> Vec<String> {
        let handle = self
            .coordinator
            .entry_by_key(&LogicalKey::from(key))
            .and_then(|entry| self.widgets.handle(&entry.id));
        match handle {
            Some(handle) => {
                action(&handle);
                vec![format!("{key}: {} callback(s) pending", self.coordinator.pending_callbacks())]
            }
            None => vec![format!("{key}: not open")],
        }
    }
}

fn format_entry(entry: &WindowEntry) -> String {
    let state = if entry.focused {
        "focused"
    } else if entry.minimized {
        "minimized"
    } else {
        "normal"
    };
    format!("{}\t{}\t{}\t{}", entry.key, entry.title, state, entry.id)
}

fn format_log(entry: &LogEntry) -> String {
    let mut line = format!(
        "#{} {} {:<5} {}: {}",
        entry.id,
        entry.timestamp,
        entry.level.as_str(),
        entry.namespace,
        entry.message
    );
    if !entry.context.is_empty() {
        line.push(' ');
        line.push_str(&serde_json::Value::Object(entry.context.clone()).to_string());
    }
    if let Some(error) = &entry.error {
        line.push_str(&format!(" ({}: {})", error.name, error.message));
    }
    line
}
