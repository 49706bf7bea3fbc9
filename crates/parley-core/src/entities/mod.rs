//! Domain entities

mod message;
mod reaction;

pub use message::{Message, MessageContent, PrivateNote};
pub use reaction::{ReactionKind, ReactionLedger};
