//! # parley-core
//!
//! Domain layer containing entities, value objects, and the pure data
//! structures behind the chat coordinator. This crate has zero dependencies
//! on infrastructure (web framework, transport, etc.) and no concurrency
//! logic of its own - all synchronization lives in the coordinator that
//! owns these structures.

pub mod entities;
pub mod error;
pub mod registry;
pub mod store;
pub mod typing;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Message, MessageContent, PrivateNote, ReactionKind, ReactionLedger};
pub use error::DomainError;
pub use registry::ConnectionRegistry;
pub use store::MessageStore;
pub use typing::TypingTracker;
pub use value_objects::{ConnectionId, ConnectionIdGenerator, MessageId, MessageIdParseError};
