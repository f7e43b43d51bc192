//! The registry of logical windows.

use casement_common::{LogicalKey, Rect, WindowId};
use serde::{Deserialize, Serialize};

/// One logically distinct open window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub id: WindowId,
    pub key: LogicalKey,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub minimized: bool,
    pub focused: bool,
    /// Last normal geometry applied by the coordinator.
    pub bounds: Rect,
}

/// Ordered set of [`WindowEntry`] values, in open order.
///
/// Keeps two invariants: one entry per logical key, and at most one focused
/// entry, which is never minimized.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<WindowEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &WindowId) -> Option<&WindowEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &WindowId) -> Option<&mut WindowEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.get(id).is_some()
    }

    pub fn find_by_key(&self, key: &LogicalKey) -> Option<&WindowEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn focused(&self) -> Option<&WindowEntry> {
        self.entries.iter().find(|e| e.focused)
    }

    /// Insert `entry` as the focused window, clearing focus on the others.
    /// Refuses an entry whose key or id is already present.
    pub fn insert_focused(&mut self, mut entry: WindowEntry) -> bool {
        if self.contains(&entry.id) || self.find_by_key(&entry.key).is_some() {
            return false;
        }
        self.clear_focus();
        entry.focused = true;
        entry.minimized = false;
        self.entries.push(entry);
        true
    }

    /// Focus `id` and unminimize it; every other entry loses focus.
    pub fn focus_only(&mut self, id: &WindowId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for entry in &mut self.entries {
            let target = &entry.id == id;
            entry.focused = target;
            if target {
                entry.minimized = false;
            }
        }
        true
    }

    pub fn set_minimized(&mut self, id: &WindowId, minimized: bool) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.minimized = minimized;
                if minimized {
                    entry.focused = false;
                }
                true
            }
            None => false,
        }
    }

    pub fn blur(&mut self, id: &WindowId) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.focused = false;
                true
            }
            None => false,
        }
    }

    /// Mark every entry minimized and unfocused. Returns how many entries
    /// were touched.
    pub fn minimize_all(&mut self) -> usize {
        for entry in &mut self.entries {
            entry.minimized = true;
            entry.focused = false;
        }
        self.entries.len()
    }

    pub fn remove(&mut self, id: &WindowId) -> Option<WindowEntry> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Remove every entry, returning them in open order.
    pub fn take_all(&mut self) -> Vec<WindowEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn snapshot(&self) -> Vec<WindowEntry> {
        self.entries.clone()
    }

    fn clear_focus(&mut self) {
        for entry in &mut self.entries {
            entry.focused = false;
        }
    }
}
