//! Bounded linear undo/redo history of full-value snapshots.
//!
//! Each entry is a complete copy of the active page's blocks plus the store
//! config. Recording after an undo discards the redo branch. The stack holds
//! at most [`MAX_HISTORY_ENTRIES`]; the oldest entry is evicted first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::store_config::StoreConfig;

/// Maximum number of snapshots kept per editing session.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// One history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub blocks: Vec<Block>,
    pub config: StoreConfig,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    index: usize,
    /// Set by undo/redo so the state they apply is not recorded again.
    replaying: bool,
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: Snapshot) -> Self {
        let mut entries = VecDeque::with_capacity(MAX_HISTORY_ENTRIES);
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            replaying: false,
        }
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        *self = History::new(initial);
    }

    /// Record `snapshot` if it differs from the current entry.
    ///
    /// Returns `true` when an entry was appended. The first call after an
    /// undo/redo only clears the replay flag.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        if self.replaying {
            self.replaying = false;
            return false;
        }
        if self.entries.get(self.index) == Some(&snapshot) {
            return false;
        }

        self.entries.truncate(self.index + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        true
    }

    /// Step back one entry and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.replaying = true;
        self.entries.get(self.index)
    }

    /// Step forward one entry and return it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.replaying = true;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The entry matching the current state.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index)
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }
}
