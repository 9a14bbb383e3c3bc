//! Ingestion side of the lectern read-aloud relay.
//!
//! Turns a noisy chat stream into a rate-limited, normalized broadcast of
//! read requests, fans them out to every connected reader over SSE, keeps
//! quiet streams alive with filler reads, and exposes a bearer-gated
//! manual injection API.

pub mod auth;
pub mod bootstrap;
pub mod broadcast;
pub mod chat;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod keepalive;
pub mod routes;
pub mod state;

pub use bootstrap::{RELAY_IDENTITY, RelayInfo, start_relay};
pub use broadcast::ReadBroadcaster;
pub use chat::{DEFAULT_CHAT_HOST, IrcChatSource};
pub use state::{AppState, RelayContext};
