//! # parley-gateway
//!
//! WebSocket gateway for real-time group chat: one session coordinator owns
//! all shared state and fans state changes out to connected clients.

pub mod connection;
pub mod coordinator;
pub mod fanout;
pub mod protocol;
pub mod server;

pub use server::run;
