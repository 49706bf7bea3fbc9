//! Inbound commands
//!
//! Everything a client can ask the coordinator to do.

use parley_core::MessageId;
use serde::{Deserialize, Serialize};

/// A command received from a client connection
///
/// The reaction field is a raw string rather than `ReactionKind`: anything
/// outside the fixed set must parse and then fail with `UnknownReaction`,
/// not die in deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Claim (or change) this connection's display name
    SetUsername(String),
    /// Append a text message to the shared log
    ChatMessage(String),
    /// Append a file message to the shared log
    #[serde(rename_all = "camelCase")]
    FileMessage {
        /// Raw payload as a data URI
        data: String,
        mime_type: String,
        file_name: String,
    },
    /// Apply a reaction to a message
    #[serde(rename_all = "camelCase")]
    AddReaction { message_id: MessageId, reaction: String },
    /// Withdraw a reaction from a message
    #[serde(rename_all = "camelCase")]
    RemoveReaction { message_id: MessageId, reaction: String },
    /// Send a one-to-one message to a named user
    #[serde(rename_all = "camelCase")]
    PrivateMessage { to: String, text: String },
    /// Report whether this user is composing a message
    Typing(bool),
}

impl ClientCommand {
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
