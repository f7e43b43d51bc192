use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reported by the floating-window widget library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// The widget instance was closed; calling into it is a contract violation.
    #[error("widget {0} is disposed")]
    Disposed(String),

    #[error("widget creation failed: {0}")]
    CreateFailed(String),

    #[error("widget command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("no content registered for '{0}'")]
    UnknownKey(String),

    #[error("content construction failed: {0}")]
    BuildFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("malformed ipc payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown ipc kind: {0}")]
    UnknownKind(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CasementError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Ipc(#[from] IpcError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
