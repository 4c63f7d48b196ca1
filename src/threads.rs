//! Per-counterparty message threads.
//!
//! Threads are append-only lists of messages keyed by counterparty node,
//! mixing local sends and pushed peer messages in arrival order. The registry
//! also owns the active selection (the thread the next send targets) and the
//! compose placeholder, a reserved key that always exists, stays empty, and
//! is never a valid send target.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Reserved key for the "start a new thread" slot.
pub const COMPOSE_THREAD: &str = "New Thread";

/// One message inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub author: String,
    pub content: String,
}

/// Keyed, append-only message threads plus the active selection.
#[derive(Debug)]
pub struct ThreadRegistry {
    threads: HashMap<String, Vec<ThreadMessage>>,
    selected: String,
}

impl Default for ThreadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadRegistry {
    /// Create a registry holding only the compose placeholder, selected.
    pub fn new() -> Self {
        let mut threads = HashMap::new();
        threads.insert(COMPOSE_THREAD.to_string(), Vec::new());
        Self {
            threads,
            selected: COMPOSE_THREAD.to_string(),
        }
    }

    /// Make sure a thread exists for the key. Idempotent.
    pub fn ensure(&mut self, key: &str) {
        self.threads.entry(key.to_string()).or_default();
    }

    /// Append a message to an existing thread.
    ///
    /// Returns `false` when the message was dropped: the key is unknown or it
    /// is the compose placeholder, which never holds messages.
    pub fn append(&mut self, key: &str, message: ThreadMessage) -> bool {
        if key == COMPOSE_THREAD {
            warn!("Dropped message addressed to the compose placeholder");
            return false;
        }

        match self.threads.get_mut(key) {
            Some(thread) => {
                thread.push(message);
                true
            }
            None => {
                warn!("Dropped message for unknown thread '{}'", key);
                false
            }
        }
    }

    /// Switch the active selection to an existing thread.
    pub fn select(&mut self, key: &str) -> bool {
        if self.threads.contains_key(key) {
            self.selected = key.to_string();
            true
        } else {
            warn!("Cannot select unknown thread '{}'", key);
            false
        }
    }

    /// Key of the currently selected thread.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn thread(&self, key: &str) -> Option<&[ThreadMessage]> {
        self.threads.get(key).map(|t| t.as_slice())
    }

    /// All thread keys, sorted. Includes the compose placeholder.
    pub fn counterparties(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.threads.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Replace the registry content with a snapshot (server history or a
    /// persisted session).
    ///
    /// The compose placeholder is forced present and empty regardless of
    /// what the snapshot holds for it, and a selection that no longer points
    /// at a thread falls back to the placeholder.
    pub fn load_snapshot(&mut self, threads: HashMap<String, Vec<ThreadMessage>>) {
        self.threads = threads;
        self.threads.insert(COMPOSE_THREAD.to_string(), Vec::new());

        if !self.threads.contains_key(&self.selected) {
            self.selected = COMPOSE_THREAD.to_string();
        }
    }

    /// Clone of the full thread map, for snapshot persistence.
    pub fn export(&self) -> HashMap<String, Vec<ThreadMessage>> {
        self.threads.clone()
    }
}
