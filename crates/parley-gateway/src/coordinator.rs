//! Session coordinator
//!
//! The single owner of all shared chat state. Every inbound command locks
//! the one exclusion domain (registry + message store + typing set), applies
//! the mutation, and computes the full delivery list from that consistent
//! snapshot before unlocking. Sends happen strictly after the lock is
//! released and never block on a recipient.

use crate::connection::ConnectionManager;
use crate::fanout::{self, Delivery};
use crate::protocol::{ClientCommand, ServerEvent};
use parking_lot::Mutex;
use parley_common::LimitsConfig;
use parley_core::{
    ConnectionId, ConnectionIdGenerator, ConnectionRegistry, DomainError, MessageId, MessageStore,
    PrivateNote, ReactionKind, TypingTracker,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// All shared chat state, guarded as one unit
///
/// Components are pure data structures; this struct is the only place they
/// are composed, and the coordinator's mutex is the only synchronization.
#[derive(Debug)]
struct ChatState {
    registry: ConnectionRegistry,
    store: MessageStore,
    typing: TypingTracker,
}

/// The session coordinator
///
/// Owns the connection lifecycle (connect, claim name, active, disconnect)
/// and drives all outbound emission through the connection manager.
pub struct Coordinator {
    state: Mutex<ChatState>,
    manager: ConnectionManager,
    ids: ConnectionIdGenerator,
}

impl Coordinator {
    /// Create a coordinator with the given resource limits
    pub fn new(limits: &LimitsConfig) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChatState {
                registry: ConnectionRegistry::new(),
                store: MessageStore::with_max_payload(limits.max_payload_bytes),
                typing: TypingTracker::new(),
            }),
            manager: ConnectionManager::new(),
            ids: ConnectionIdGenerator::new(),
        })
    }

    /// Register a new connection and return its identity
    ///
    /// The connection starts unnamed; only `setUsername` moves it to the
    /// named state where other commands become valid.
    pub fn connect(&self, sender: mpsc::Sender<ServerEvent>) -> ConnectionId {
        let id = self.ids.generate();
        self.manager.add_connection(id, sender);
        self.state.lock().registry.register(id);

        tracing::info!(connection_id = %id, "Connection established");

        id
    }

    /// Handle one inbound command from a connection
    pub fn handle_command(&self, sender: ConnectionId, command: ClientCommand) {
        let deliveries = {
            let mut state = self.state.lock();
            self.route(&mut state, sender, command)
        };
        self.manager.deliver(deliveries);
    }

    /// Tear down a connection
    ///
    /// Idempotent: a second disconnect for the same id, or one racing a
    /// late command, finds no registry entry and does nothing further.
    pub fn disconnect(&self, id: ConnectionId) {
        self.manager.remove_connection(id);

        let deliveries = {
            let mut state = self.state.lock();
            if !state.registry.contains(id) {
                return;
            }
            let released = state.registry.unregister(id);

            let Some(name) = released else {
                tracing::info!(connection_id = %id, "Unnamed connection closed");
                return;
            };
            state.typing.clear(&name);

            tracing::info!(connection_id = %id, username = %name, "User disconnected");

            let recipients = state.registry.connection_ids();
            let mut out = fanout::broadcast_all(&recipients, &ServerEvent::UserLeft(name));
            out.extend(fanout::broadcast_all(
                &recipients,
                &ServerEvent::UserListUpdate(state.registry.snapshot_names()),
            ));
            out.extend(fanout::broadcast_all(
                &recipients,
                &ServerEvent::TypingUpdate(state.typing.snapshot()),
            ));
            out
        };
        self.manager.deliver(deliveries);
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.manager.connection_count()
    }

    /// Compute state change and delivery list for one command
    ///
    /// Runs entirely under the state lock, so every delivery list reflects
    /// a state some linearized execution order actually produced.
    fn route(
        &self,
        state: &mut ChatState,
        sender: ConnectionId,
        command: ClientCommand,
    ) -> Vec<Delivery> {
        match command {
            ClientCommand::SetUsername(name) => match state.registry.claim_name(sender, &name) {
                Ok(previous) => {
                    let Some(claimed) = state.registry.name_of(sender) else {
                        return Vec::new();
                    };
                    let claimed = claimed.to_string();

                    tracing::info!(
                        connection_id = %sender,
                        username = %claimed,
                        rename = previous.is_some(),
                        "Name claimed"
                    );

                    let recipients = state.registry.connection_ids();
                    let mut out = Vec::new();
                    // Join notice only on the first claim; a rename just
                    // refreshes the list
                    if previous.is_none() {
                        out.extend(fanout::broadcast_except(
                            &recipients,
                            sender,
                            &ServerEvent::UserJoined(claimed),
                        ));
                    }
                    out.extend(fanout::broadcast_all(
                        &recipients,
                        &ServerEvent::UserListUpdate(state.registry.snapshot_names()),
                    ));
                    out
                }
                Err(e) => self.reject(sender, &e),
            },

            ClientCommand::ChatMessage(text) => {
                let author = match self.named(state, sender) {
                    Ok(author) => author,
                    Err(e) => return self.reject(sender, &e),
                };
                let message = state.store.append_text(&author, text).clone();

                tracing::debug!(
                    connection_id = %sender,
                    message_id = %message.id,
                    "Text message appended"
                );

                let recipients = state.registry.connection_ids();
                fanout::broadcast_all(&recipients, &ServerEvent::NewMessage(message))
            }

            ClientCommand::FileMessage {
                data,
                mime_type,
                file_name,
            } => {
                let author = match self.named(state, sender) {
                    Ok(author) => author,
                    Err(e) => return self.reject(sender, &e),
                };
                match state.store.append_file(&author, data, mime_type, file_name) {
                    Ok(message) => {
                        let message = message.clone();

                        tracing::debug!(
                            connection_id = %sender,
                            message_id = %message.id,
                            "File message appended"
                        );

                        let recipients = state.registry.connection_ids();
                        fanout::broadcast_all(&recipients, &ServerEvent::NewMessage(message))
                    }
                    Err(e) => self.reject(sender, &e),
                }
            }

            ClientCommand::AddReaction {
                message_id,
                reaction,
            } => self.apply_reaction(state, sender, message_id, &reaction, true),

            ClientCommand::RemoveReaction {
                message_id,
                reaction,
            } => self.apply_reaction(state, sender, message_id, &reaction, false),

            ClientCommand::PrivateMessage { to, text } => {
                let from = match self.named(state, sender) {
                    Ok(from) => from,
                    Err(e) => return self.reject(sender, &e),
                };
                let note = PrivateNote::new(from, to.clone(), text);

                let mut out = Vec::new();
                match state.registry.connection_of(&to) {
                    Some(target) => {
                        out.extend(fanout::unicast(
                            target,
                            ServerEvent::PrivateMessage(note.clone()),
                        ));
                    }
                    None => {
                        // Unicast dropped; the sender still gets the echo
                        let err = DomainError::RecipientUnavailable(to);
                        tracing::debug!(connection_id = %sender, error = %err, "Private message dropped");
                    }
                }
                out.extend(fanout::echo(sender, ServerEvent::PrivateMessage(note)));
                out
            }

            ClientCommand::Typing(is_typing) => {
                let username = match self.named(state, sender) {
                    Ok(username) => username,
                    Err(e) => return self.reject(sender, &e),
                };
                state.typing.set_typing(&username, is_typing);

                // Always broadcast, even when the set did not change:
                // clients replace their view wholesale
                let recipients = state.registry.connection_ids();
                fanout::broadcast_except(
                    &recipients,
                    sender,
                    &ServerEvent::TypingUpdate(state.typing.snapshot()),
                )
            }
        }
    }

    /// Shared path for add/remove reaction
    fn apply_reaction(
        &self,
        state: &mut ChatState,
        sender: ConnectionId,
        message_id: MessageId,
        reaction: &str,
        add: bool,
    ) -> Vec<Delivery> {
        let username = match self.named(state, sender) {
            Ok(username) => username,
            Err(e) => return self.reject(sender, &e),
        };
        let Some(kind) = ReactionKind::from_str(reaction) else {
            return self.reject(sender, &DomainError::UnknownReaction(reaction.to_string()));
        };
        let message = match state.store.find_mut(message_id) {
            Ok(message) => message,
            Err(e) => return self.reject(sender, &e),
        };

        let changed = if add {
            message.reactions.add(kind, &username)
        } else {
            message.reactions.remove(kind, &username)
        };
        if !changed {
            // Idempotent no-op: no second broadcast
            return Vec::new();
        }

        let reactions = message.reactions.clone();
        let recipients = state.registry.connection_ids();
        fanout::broadcast_all(
            &recipients,
            &ServerEvent::ReactionUpdate {
                message_id,
                reactions,
            },
        )
    }

    /// Resolve the sender's display name, or fail `Unauthenticated`
    fn named(&self, state: &ChatState, sender: ConnectionId) -> Result<String, DomainError> {
        state
            .registry
            .name_of(sender)
            .map(str::to_string)
            .ok_or(DomainError::Unauthenticated)
    }

    /// Turn a rejected command into deliveries
    ///
    /// Silent errors produce no event at all; the rest are acknowledged
    /// back to the offending sender only.
    fn reject(&self, sender: ConnectionId, err: &DomainError) -> Vec<Delivery> {
        if err.is_silent() {
            tracing::debug!(connection_id = %sender, error = %err, "Command ignored");
            Vec::new()
        } else {
            tracing::debug!(connection_id = %sender, error = %err, "Command rejected");
            fanout::echo(sender, ServerEvent::Error(err.clone().into()))
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("connections", &self.manager.connection_count())
            .finish()
    }
}
