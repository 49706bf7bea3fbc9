//! Connection manager
//!
//! Holds the outbound half of every live connection. Uses `DashMap` so
//! delivery can look up senders without touching the coordinator's state
//! lock.

use super::Connection;
use crate::fanout::Delivery;
use dashmap::DashMap;
use parley_core::ConnectionId;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::protocol::ServerEvent;

/// Manages the outbound channels of all active connections
#[derive(Default)]
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        id: ConnectionId,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Arc<Connection> {
        let connection = Connection::new(id, sender);
        self.connections.insert(id, connection.clone());

        tracing::debug!(connection_id = %id, "Connection added");

        connection
    }

    /// Remove a connection
    ///
    /// Idempotent: removing an unknown id is a no-op.
    pub fn remove_connection(&self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            tracing::debug!(connection_id = %id, "Connection removed");
        }
    }

    /// Get a connection by id
    pub fn get_connection(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(&id).map(|r| r.clone())
    }

    /// Deliver a batch of routed events
    ///
    /// Fire-and-forget per recipient: a missing connection or a full or
    /// closed channel is logged and skipped, never aborting the rest of
    /// the batch. Returns the number of events actually handed off.
    pub fn deliver(&self, deliveries: Vec<Delivery>) -> usize {
        let mut sent = 0;

        for delivery in deliveries {
            let Some(connection) = self.get_connection(delivery.target) else {
                tracing::trace!(
                    connection_id = %delivery.target,
                    event = %delivery.event,
                    "Recipient gone before delivery, skipping"
                );
                continue;
            };

            match connection.try_send(delivery.event) {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %delivery.target,
                        error = %e,
                        "Failed to deliver event, skipping recipient"
                    );
                }
            }
        }

        sent
    }

    /// Number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}
