//! Message entity - one entry in the shared chat log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ReactionLedger;
use crate::value_objects::MessageId;

/// Message content - exactly one of plain text or a file payload
///
/// A tagged variant rather than optional fields, so "both present" and
/// "neither present" are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageContent {
    #[serde(rename_all = "camelCase")]
    Text { text: String },
    #[serde(rename_all = "camelCase")]
    File {
        /// Raw payload as a data URI
        data: String,
        mime_type: String,
        file_name: String,
    },
}

impl MessageContent {
    /// Create text content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create file content
    pub fn file(
        data: impl Into<String>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self::File {
            data: data.into(),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Check if this is a file payload
    #[inline]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Payload size in bytes, as transferred
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Text { text } => text.len(),
            Self::File { data, .. } => data.len(),
        }
    }
}

/// Message entity
///
/// Once appended, id, author, timestamp, and content are immutable; only
/// the reaction ledger mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub content: MessageContent,
    pub reactions: ReactionLedger,
}

impl Message {
    /// Create a new message with an empty reaction ledger
    pub fn new(id: MessageId, author: impl Into<String>, content: MessageContent) -> Self {
        Self {
            id,
            author: author.into(),
            timestamp: Utc::now(),
            content,
            reactions: ReactionLedger::new(),
        }
    }

    /// Check if message content is empty text
    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.content {
            MessageContent::Text { text } => text.trim().is_empty(),
            MessageContent::File { .. } => false,
        }
    }
}

/// Private message - ephemeral, routed to sender and recipient only
///
/// Never stored in the shared log and never broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateNote {
    pub from: String,
    pub to: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl PrivateNote {
    /// Create a new private note with the current timestamp
    pub fn new(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ReactionKind;

    #[test]
    fn test_message_creation() {
        let msg = Message::new(MessageId::new(1), "alice", MessageContent::text("hi"));
        assert_eq!(msg.author, "alice");
        assert!(!msg.is_empty());
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn test_content_stays_immutable_under_reactions() {
        let mut msg = Message::new(MessageId::new(1), "alice", MessageContent::text("hi"));
        let (id, author, timestamp, content) =
            (msg.id, msg.author.clone(), msg.timestamp, msg.content.clone());

        msg.reactions.add(ReactionKind::ThumbsUp, "bob");
        msg.reactions.add(ReactionKind::Heart, "carol");
        msg.reactions.remove(ReactionKind::ThumbsUp, "bob");

        assert_eq!(msg.id, id);
        assert_eq!(msg.author, author);
        assert_eq!(msg.timestamp, timestamp);
        assert_eq!(msg.content, content);
    }

    #[test]
    fn test_file_content() {
        let content = MessageContent::file("data:image/png;base64,AAAA", "image/png", "a.png");
        assert!(content.is_file());
        assert_eq!(content.payload_len(), 26);
    }

    #[test]
    fn test_text_message_wire_shape() {
        let msg = Message::new(MessageId::new(7), "alice", MessageContent::text("hi"));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["author"], "alice");
        assert_eq!(value["kind"], "text");
        assert_eq!(value["text"], "hi");
        assert_eq!(value["reactions"], serde_json::json!({}));
    }

    #[test]
    fn test_file_message_wire_shape() {
        let msg = Message::new(
            MessageId::new(8),
            "bob",
            MessageContent::file("data:text/plain;base64,aGk=", "text/plain", "hi.txt"),
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["kind"], "file");
        assert_eq!(value["mimeType"], "text/plain");
        assert_eq!(value["fileName"], "hi.txt");
    }

    #[test]
    fn test_private_note_is_standalone() {
        let note = PrivateNote::new("alice", "bob", "psst");
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["from"], "alice");
        assert_eq!(value["to"], "bob");
        // No message id: private notes never enter the shared log
        assert!(value.get("id").is_none());
    }
}
