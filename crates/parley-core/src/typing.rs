//! Typing presence tracker
//!
//! The set of usernames currently composing a message. Every change
//! produces a fresh full snapshot; clients replace their view wholesale,
//! so duplicate snapshots are harmless.

use std::collections::BTreeSet;

/// Set of usernames currently typing
#[derive(Debug, Default)]
pub struct TypingTracker {
    typing: BTreeSet<String>,
}

impl TypingTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a username from the typing set
    ///
    /// Returns whether the set changed. Callers broadcast the snapshot
    /// regardless of the return value (always-broadcast behavior).
    pub fn set_typing(&mut self, username: &str, is_typing: bool) -> bool {
        if is_typing {
            self.typing.insert(username.to_string())
        } else {
            self.typing.remove(username)
        }
    }

    /// Remove a username unconditionally; used on disconnect
    ///
    /// Idempotent.
    pub fn clear(&mut self, username: &str) {
        self.typing.remove(username);
    }

    /// Current snapshot of typing usernames
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.typing.iter().cloned().collect()
    }

    /// Check whether a username is currently typing
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.typing.contains(username)
    }
}
