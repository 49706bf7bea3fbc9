//! Message store - append-only ordered log of chat messages
//!
//! Messages are immutable after append except for their reaction ledgers.
//! Ids are strictly increasing in append order across text and file
//! messages alike, giving clients a stable display order independent of
//! wall-clock timestamp collisions.

use crate::entities::{Message, MessageContent};
use crate::error::DomainError;
use crate::value_objects::MessageId;

/// Default ceiling for file payloads: 10 MB
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10_000_000;

/// Append-only ordered log of messages
#[derive(Debug)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
    max_payload_bytes: usize,
}

impl MessageStore {
    /// Create an empty store with the default payload ceiling
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_BYTES)
    }

    /// Create an empty store with a custom payload ceiling
    #[must_use]
    pub fn with_max_payload(max_payload_bytes: usize) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            max_payload_bytes,
        }
    }

    /// Append a text message, returning a reference to the stored entry
    pub fn append_text(&mut self, author: &str, text: impl Into<String>) -> &Message {
        self.push(author, MessageContent::text(text.into()))
    }

    /// Append a file message
    ///
    /// Fails with `PayloadTooLarge` if the payload exceeds the configured
    /// ceiling; nothing is stored in that case.
    pub fn append_file(
        &mut self,
        author: &str,
        data: impl Into<String>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Result<&Message, DomainError> {
        let content = MessageContent::file(data, mime_type, file_name);
        let size = content.payload_len();
        if size > self.max_payload_bytes {
            return Err(DomainError::PayloadTooLarge {
                size,
                max: self.max_payload_bytes,
            });
        }
        Ok(self.push(author, content))
    }

    fn push(&mut self, author: &str, content: MessageContent) -> &Message {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        self.messages.push(Message::new(id, author, content));
        // Last element exists by construction
        &self.messages[self.messages.len() - 1]
    }

    /// Look up a message by id
    pub fn find(&self, id: MessageId) -> Result<&Message, DomainError> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))
    }

    /// Look up a message by id for reaction-ledger mutation
    pub fn find_mut(&mut self, id: MessageId) -> Result<&mut Message, DomainError> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))
    }

    /// Number of stored messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Configured payload ceiling in bytes
    #[must_use]
    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
