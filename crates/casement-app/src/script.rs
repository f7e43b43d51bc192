//! The line-oriented session script language.
//!
//! One command per line; blank lines and `#` comments are skipped.

use casement_bus::{Topic, UnknownTopic};
use casement_windows::Panel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open { key: String, title: String },
    Activate { key: String },
    MinimizeAll,
    CloseAll,
    Pump,
    List,
    Logs { count: usize },
    History { topic: Option<Topic> },
    UserMinimize { key: String },
    UserRestore { key: String },
    UserClose { key: String },
    Panel { panel: Panel, visible: bool },
    /// A raw IPC message from window content: `ipc <kind> <json>`.
    Ipc { kind: String, payload: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: &'static str, value: String },

    #[error(transparent)]
    Topic(#[from] UnknownTopic),
}

const DEFAULT_LOG_COUNT: usize = 20;

/// Parse one script line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "open" => {
            let (key, title) = match rest.split_once(char::is_whitespace) {
                Some((key, title)) => (key, title.trim()),
                None => (rest, rest),
            };
            Command::Open {
                key: required("open", "<key> [title]", key)?,
                title: title.to_string(),
            }
        }
        "activate" => Command::Activate {
            key: required("activate", "<key>", rest)?,
        },
        "minimize-all" => Command::MinimizeAll,
        "close-all" => Command::CloseAll,
        "pump" => Command::Pump,
        "list" => Command::List,
        "logs" => Command::Logs {
            count: if rest.is_empty() {
                DEFAULT_LOG_COUNT
            } else {
                rest.parse().map_err(|_| ScriptError::InvalidArgument {
                    command: "logs",
                    value: rest.to_string(),
                })?
            },
        },
        "history" => Command::History {
            topic: if rest.is_empty() {
                None
            } else {
                Some(rest.parse()?)
            },
        },
        "user-minimize" => Command::UserMinimize {
            key: required("user-minimize", "<key>", rest)?,
        },
        "user-restore" => Command::UserRestore {
            key: required("user-restore", "<key>", rest)?,
        },
        "user-close" => Command::UserClose {
            key: required("user-close", "<key>", rest)?,
        },
        "panel" => parse_panel(rest)?,
        "ipc" => {
            let (kind, payload) =
                rest.split_once(char::is_whitespace)
                    .ok_or(ScriptError::MissingArgument {
                        command: "ipc",
                        expected: "<kind> <json>",
                    })?;
            Command::Ipc {
                kind: kind.to_string(),
                payload: payload.trim().to_string(),
            }
        }
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn required(
    command: &'static str,
    expected: &'static str,
    value: &str,
) -> Result<String, ScriptError> {
    if value.is_empty() {
        Err(ScriptError::MissingArgument { command, expected })
    } else {
        Ok(value.to_string())
    }
}

fn parse_panel(rest: &str) -> Result<Command, ScriptError> {
    let mut parts = rest.split_whitespace();
    let missing = ScriptError::MissingArgument {
        command: "panel",
        expected: "top|bottom on|off",
    };
    let panel = match parts.next() {
        Some("top") => Panel::Top,
        Some("bottom") => Panel::Bottom,
        Some(other) => {
            return Err(ScriptError::InvalidArgument {
                command: "panel",
                value: other.to_string(),
            })
        }
        None => return Err(missing),
    };
    let visible = match parts.next() {
        Some("on") => true,
        Some("off") => false,
        Some(other) => {
            return Err(ScriptError::InvalidArgument {
                command: "panel",
                value: other.to_string(),
            })
        }
        None => return Err(missing),
    };
    Ok(Command::Panel { panel, visible })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn skips_blank_and_comments() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# open clock").unwrap(), None);
    }

    #[test]
    fn open_takes_rest_of_line_as_title() {
        assert_eq!(
            parse("open notes  My Notes"),
            Command::Open {
                key: "notes".into(),
                title: "My Notes".into()
            }
        );
        assert_eq!(
            parse("open clock"),
            Command::Open {
                key: "clock".into(),
                title: "clock".into()
            }
        );
    }

    #[test]
    fn open_without_key_is_an_error() {
        assert!(matches!(
            parse_line("open"),
            Err(ScriptError::MissingArgument { command: "open", .. })
        ));
    }

    #[test]
    fn simple_verbs() {
        assert_eq!(parse("minimize-all"), Command::MinimizeAll);
        assert_eq!(parse("close-all"), Command::CloseAll);
        assert_eq!(parse("pump"), Command::Pump);
        assert_eq!(parse("list"), Command::List);
        assert_eq!(parse("activate clock"), Command::Activate { key: "clock".into() });
        assert_eq!(parse("user-close clock"), Command::UserClose { key: "clock".into() });
    }

    #[test]
    fn logs_count_is_optional() {
        assert_eq!(parse("logs"), Command::Logs { count: 20 });
        assert_eq!(parse("logs 3"), Command::Logs { count: 3 });
        assert!(matches!(
            parse_line("logs many"),
            Err(ScriptError::InvalidArgument { command: "logs", .. })
        ));
    }

    #[test]
    fn history_topic_is_validated() {
        assert_eq!(parse("history"), Command::History { topic: None });
        assert_eq!(
            parse("history window:closed"),
            Command::History {
                topic: Some(Topic::WindowClosed)
            }
        );
        assert!(matches!(parse_line("history window:exploded"), Err(ScriptError::Topic(_))));
    }

    #[test]
    fn panel_toggles() {
        assert_eq!(
            parse("panel bottom off"),
            Command::Panel {
                panel: Panel::Bottom,
                visible: false
            }
        );
        assert!(parse_line("panel side on").is_err());
        assert!(parse_line("panel top").is_err());
    }

    #[test]
    fn ipc_keeps_payload_verbatim() {
        assert_eq!(
            parse(r#"ipc log_message {"message": "hi there"}"#),
            Command::Ipc {
                kind: "log_message".into(),
                payload: r#"{"message": "hi there"}"#.into()
            }
        );
    }

    #[test]
    fn unknown_verb() {
        assert_eq!(
            parse_line("explode"),
            Err(ScriptError::UnknownCommand("explode".into()))
        );
    }
}
