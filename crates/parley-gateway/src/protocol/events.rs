//! Outbound events
//!
//! Everything the coordinator can push to a client connection.

use parley_common::ErrorResponse;
use parley_core::{Message, MessageId, PrivateNote, ReactionLedger};
use serde::{Deserialize, Serialize};

/// An event emitted to one or more client connections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A message was appended to the shared log (full message, ledger included)
    NewMessage(Message),
    /// A message's reaction ledger changed; the full ledger is re-sent
    #[serde(rename_all = "camelCase")]
    ReactionUpdate {
        message_id: MessageId,
        reactions: ReactionLedger,
    },
    /// A private message, delivered to recipient and echoed to sender only
    PrivateMessage(PrivateNote),
    /// Current name sequence, ordered by registration
    UserListUpdate(Vec<String>),
    /// Current typing snapshot
    TypingUpdate(Vec<String>),
    /// A user claimed a name
    UserJoined(String),
    /// A named user disconnected
    UserLeft(String),
    /// A rejected command, reported back to the offending sender only
    Error(ErrorResponse),
}

impl ServerEvent {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Short event name, for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "newMessage",
            Self::ReactionUpdate { .. } => "reactionUpdate",
            Self::PrivateMessage(_) => "privateMessage",
            Self::UserListUpdate(_) => "userListUpdate",
            Self::TypingUpdate(_) => "typingUpdate",
            Self::UserJoined(_) => "userJoined",
            Self::UserLeft(_) => "userLeft",
            Self::Error(_) => "error",
        }
    }
}

impl std::fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServerEvent({})", self.name())
    }
}
