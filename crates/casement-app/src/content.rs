//! Built-in content for the demo shell.

use async_trait::async_trait;
use casement_common::{ContentError, LogicalKey};
use casement_windows::{ContentBuilder, WindowContent};

/// Card catalog: logical key, icon, body markup.
const CATALOG: &[(&str, &str, &str)] = &[
    ("clock", "clock", "<time data-live></time>"),
    ("notes", "pen", "<textarea placeholder=\"Notes\"></textarea>"),
    ("files", "folder", "<ul class=\"files\"></ul>"),
    ("sysinfo", "chip", "<dl class=\"sysinfo\"></dl>"),
    ("settings", "gear", "<form class=\"settings\"></form>"),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct DemoContent;

impl DemoContent {
    pub fn icon(key: &str) -> Option<&'static str> {
        CATALOG.iter().find(|(k, _, _)| *k == key).map(|(_, icon, _)| *icon)
    }
}

#[async_trait]
impl ContentBuilder for DemoContent {
    async fn build(&self, key: &LogicalKey) -> Result<WindowContent, ContentError> {
        CATALOG
            .iter()
            .find(|(k, _, _)| *k == key.as_str())
            .map(|(_, _, body)| WindowContent::new(key.clone(), *body))
            .ok_or_else(|| ContentError::UnknownKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_known_keys() {
        let content = DemoContent.build(&LogicalKey::from("clock")).await.unwrap();
        assert!(content.body.contains("<time"));
    }

    #[tokio::test]
    async fn unknown_key_fails() {
        let err = DemoContent.build(&LogicalKey::from("nope")).await.unwrap_err();
        assert_eq!(err, ContentError::UnknownKey("nope".into()));
    }

    #[test]
    fn icons_come_from_catalog() {
        assert_eq!(DemoContent::icon("notes"), Some("pen"));
        assert_eq!(DemoContent::icon("nope"), None);
    }
}
