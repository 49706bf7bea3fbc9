//! Value objects - identifiers used throughout the domain

mod ids;

pub use ids::{ConnectionId, ConnectionIdGenerator, MessageId, MessageIdParseError};
