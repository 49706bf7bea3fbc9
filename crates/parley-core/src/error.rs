//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::MessageId;

/// Domain layer errors
///
/// All of these are handled locally by the session coordinator: none
/// propagate to other connections' sessions and none abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Unknown reaction kind: {0}")]
    UnknownReaction(String),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Invalid name: empty or whitespace-only")]
    InvalidName,

    #[error("Recipient not connected: {0}")]
    RecipientUnavailable(String),

    #[error("No username claimed for this connection")]
    Unauthenticated,
}

impl DomainError {
    /// Get an error code string for wire responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::UnknownReaction(_) => "UNKNOWN_REACTION",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::InvalidName => "INVALID_NAME",
            Self::RecipientUnavailable(_) => "RECIPIENT_UNAVAILABLE",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Check if this error is dropped silently rather than acknowledged
    ///
    /// Silent errors change no routing for other parties; surfacing them to
    /// the sender is purely additive.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::InvalidName | Self::RecipientUnavailable(_))
    }
}
