//! Session history seam.

use serde::{Deserialize, Serialize};

/// Mirror of the current history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Location path, percent-encoded as the browser reports it.
    pub path: String,
    /// Fragment without the leading `#`. Empty when absent.
    pub hash: String,
}

impl NavigationState {
    /// Creates a state from a path and a fragment (with or without `#`).
    pub fn new(path: impl Into<String>, hash: &str) -> Self {
        Self {
            path: path.into(),
            hash: hash.strip_prefix('#').unwrap_or(hash).to_string(),
        }
    }

    /// The location as a path plus optional `#fragment`.
    pub fn href(&self) -> String {
        if self.hash.is_empty() {
            self.path.clone()
        } else {
            format!("{}#{}", self.path, self.hash)
        }
    }
}

/// Access to the host's session history.
pub trait History {
    /// Reads the current entry.
    fn current(&self) -> NavigationState;

    /// Pushes a new entry and makes it current.
    fn push(&mut self, state: &NavigationState);
}

/// In-memory history for tests and hosts without a browser.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<NavigationState>,
    index: usize,
}

impl MemoryHistory {
    /// Starts a history with a single entry.
    pub fn new(initial: NavigationState) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Moves one entry back. Returns false at the start of the history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Moves one entry forward. Returns false at the end of the history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl History for MemoryHistory {
    fn current(&self) -> NavigationState {
        self.entries[self.index].clone()
    }

    fn push(&mut self, state: &NavigationState) {
        self.entries.truncate(self.index + 1);
        self.entries.push(state.clone());
        self.index = self.entries.len() - 1;
    }
}
