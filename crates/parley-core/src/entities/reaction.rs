//! Reaction kinds and the per-message reaction ledger

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Reaction kind - one member of the fixed enumerated reaction set
///
/// Serialized as the emoji string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReactionKind {
    #[serde(rename = "\u{1F44D}")]
    ThumbsUp,
    #[serde(rename = "\u{2764}\u{FE0F}")]
    Heart,
    #[serde(rename = "\u{1F604}")]
    Laugh,
    #[serde(rename = "\u{1F62E}")]
    Surprised,
    #[serde(rename = "\u{1F622}")]
    Sad,
    #[serde(rename = "\u{1F621}")]
    Angry,
}

impl ReactionKind {
    /// All reaction kinds, in display order
    pub const ALL: [ReactionKind; 6] = [
        Self::ThumbsUp,
        Self::Heart,
        Self::Laugh,
        Self::Surprised,
        Self::Sad,
        Self::Angry,
    ];

    /// Get the emoji string for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThumbsUp => "\u{1F44D}",
            Self::Heart => "\u{2764}\u{FE0F}",
            Self::Laugh => "\u{1F604}",
            Self::Surprised => "\u{1F62E}",
            Self::Sad => "\u{1F622}",
            Self::Angry => "\u{1F621}",
        }
    }

    /// Parse an emoji string into a reaction kind
    ///
    /// Returns `None` for anything outside the fixed set.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-message mapping from reaction kind to the set of users who applied it
///
/// Invariants: a username appears at most once per kind, and a kind whose
/// user set becomes empty is removed from the mapping entirely, so clients
/// can treat "key absent" and "count zero" as equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionLedger {
    entries: BTreeMap<ReactionKind, BTreeSet<String>>,
}

impl ReactionLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently add `username` to `kind`'s user set
    ///
    /// Returns whether the ledger changed (false if already present). The
    /// caller uses this to suppress duplicate broadcasts.
    pub fn add(&mut self, kind: ReactionKind, username: &str) -> bool {
        self.entries
            .entry(kind)
            .or_default()
            .insert(username.to_string())
    }

    /// Idempotently remove `username` from `kind`'s user set
    ///
    /// Deletes the kind entry entirely when its set becomes empty. Returns
    /// whether the ledger changed.
    pub fn remove(&mut self, kind: ReactionKind, username: &str) -> bool {
        let Some(users) = self.entries.get_mut(&kind) else {
            return false;
        };
        let changed = users.remove(username);
        if users.is_empty() {
            self.entries.remove(&kind);
        }
        changed
    }

    /// Check whether `username` has applied `kind`
    #[must_use]
    pub fn contains(&self, kind: ReactionKind, username: &str) -> bool {
        self.entries
            .get(&kind)
            .is_some_and(|users| users.contains(username))
    }

    /// Number of users who applied `kind` (zero when the key is absent)
    #[must_use]
    pub fn count(&self, kind: ReactionKind) -> usize {
        self.entries.get(&kind).map_or(0, BTreeSet::len)
    }

    /// Check whether the ledger has no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (kind, user set) entries
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, &BTreeSet<String>)> {
        self.entries.iter().map(|(kind, users)| (*kind, users))
    }
}
