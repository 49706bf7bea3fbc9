//! Fanout router
//!
//! Pure routing: given a recipient snapshot and an event, produce the list
//! of (recipient, event) pairs for one of the four delivery classes. The
//! coordinator computes these under its state lock so every delivery list
//! reflects a consistent snapshot; actual sends happen after the lock is
//! released.

use crate::protocol::ServerEvent;
use parley_core::ConnectionId;

/// One routed event: which connection gets which payload
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub target: ConnectionId,
    pub event: ServerEvent,
}

impl Delivery {
    /// Create a delivery
    #[must_use]
    pub fn new(target: ConnectionId, event: ServerEvent) -> Self {
        Self { target, event }
    }
}

/// Broadcast to every registered connection, sender included
///
/// Used for: new message, reaction update, user-list update.
pub fn broadcast_all(recipients: &[ConnectionId], event: &ServerEvent) -> Vec<Delivery> {
    recipients
        .iter()
        .map(|&target| Delivery::new(target, event.clone()))
        .collect()
}

/// Broadcast to every registered connection except the sender
///
/// Used for: user-joined notice, user-left notice, typing snapshot.
pub fn broadcast_except(
    recipients: &[ConnectionId],
    sender: ConnectionId,
    event: &ServerEvent,
) -> Vec<Delivery> {
    recipients
        .iter()
        .filter(|&&target| target != sender)
        .map(|&target| Delivery::new(target, event.clone()))
        .collect()
}

/// Deliver to exactly one connection resolved by name
///
/// Used for: private-message delivery to the recipient.
pub fn unicast(target: ConnectionId, event: ServerEvent) -> Vec<Delivery> {
    vec![Delivery::new(target, event)]
}

/// Deliver to exactly the sender's own connection
///
/// Used for: private-message self-echo and error acknowledgments.
pub fn echo(sender: ConnectionId, event: ServerEvent) -> Vec<Delivery> {
    vec![Delivery::new(sender, event)]
}
