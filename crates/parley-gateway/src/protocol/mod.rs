//! Wire protocol
//!
//! JSON message formats exchanged with clients over the WebSocket. Both
//! directions use the same envelope: `{"type": <name>, "data": <payload>}`.

mod commands;
mod events;

pub use commands::ClientCommand;
pub use events::ServerEvent;
