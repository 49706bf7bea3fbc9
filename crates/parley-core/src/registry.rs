//! Connection registry - maps live connections to display names
//!
//! A pure data structure; the coordinator serializes all access. Keys are
//! monotonic connection ids, so BTreeMap iteration order is registration
//! order. That ordering is load-bearing twice over: `snapshot_names`
//! enumerates names in registration order, and `connection_of` resolves a
//! duplicate display name to its earliest-registered holder.

use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::value_objects::ConnectionId;

/// Registry of live connections and their claimed display names
///
/// Display names are not unique: two connections may hold the same name
/// simultaneously. Private-message routing then picks the
/// earliest-registered holder.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: BTreeMap<ConnectionId, Option<String>>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unnamed entry for a new connection
    pub fn register(&mut self, id: ConnectionId) {
        self.entries.entry(id).or_insert(None);
    }

    /// Bind a display name to a connection
    ///
    /// The name is trimmed of surrounding whitespace; an empty result fails
    /// with `InvalidName` and leaves state untouched. Overwrites any
    /// previous binding for this connection (rename). Returns the previous
    /// name, if any, so the caller can tell a first claim from a rename.
    ///
    /// Fails with `Unauthenticated` if the connection is not registered: a
    /// claim racing a disconnect must not re-create the removed entry.
    pub fn claim_name(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<Option<String>, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidName);
        }
        let Some(slot) = self.entries.get_mut(&id) else {
            return Err(DomainError::Unauthenticated);
        };
        Ok(slot.replace(trimmed.to_string()))
    }

    /// Remove a connection's entry, returning its released name if any
    ///
    /// Idempotent: removing an unknown id returns None.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<String> {
        self.entries.remove(&id).flatten()
    }

    /// Current name of a connection, if one is bound
    #[must_use]
    pub fn name_of(&self, id: ConnectionId) -> Option<&str> {
        self.entries.get(&id).and_then(Option::as_deref)
    }

    /// First connection currently bound to `name`, in registration order
    #[must_use]
    pub fn connection_of(&self, name: &str) -> Option<ConnectionId> {
        self.entries
            .iter()
            .find(|(_, bound)| bound.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    /// All bound names, ordered by registration
    #[must_use]
    pub fn snapshot_names(&self) -> Vec<String> {
        self.entries.values().flatten().cloned().collect()
    }

    /// All registered connection ids, named or not
    #[must_use]
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.entries.keys().copied().collect()
    }

    /// Check whether a connection is registered
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered connections
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
