//! Individual WebSocket connection
//!
//! Represents one live connection's outbound half: a bounded channel
//! consumed by the connection's writer task.

use crate::protocol::ServerEvent;
use parley_core::ConnectionId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A single client connection
pub struct Connection {
    /// Opaque connection identity, never reused
    id: ConnectionId,

    /// Channel to the writer task feeding the WebSocket
    sender: mpsc::Sender<ServerEvent>,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self { id, sender })
    }

    /// Get the connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Try to send an event without blocking
    ///
    /// Fanout never waits on a slow consumer: a full or closed channel is
    /// that one recipient's loss, not anyone else's.
    pub fn try_send(
        &self,
        event: ServerEvent,
    ) -> Result<(), mpsc::error::TrySendError<ServerEvent>> {
        self.sender.try_send(event)
    }

    /// Check if the writer side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
