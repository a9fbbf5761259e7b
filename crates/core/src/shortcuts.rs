//! Keyboard shortcuts for the Design tab.

use serde::{Deserialize, Serialize};

use crate::session::AdminTab;

/// A key press with its modifier state, as reported by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    /// Cmd on macOS.
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutAction {
    Undo,
    Redo,
    Save,
}

/// Resolve a chord to an action. Shortcuts only fire on the Design tab.
pub fn resolve(tab: AdminTab, chord: &KeyChord) -> Option<ShortcutAction> {
    if tab != AdminTab::Design || !(chord.ctrl || chord.meta) {
        return None;
    }
    match (chord.key.to_ascii_lowercase().as_str(), chord.shift) {
        ("z", false) => Some(ShortcutAction::Undo),
        ("z", true) | ("y", _) => Some(ShortcutAction::Redo),
        ("s", _) => Some(ShortcutAction::Save),
        _ => None,
    }
}
