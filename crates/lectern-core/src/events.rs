//! Canonical event union for the relay-to-reader broadcast channel.
//!
//! This module is the single source of truth for the wire messages every
//! connected reader receives over the SSE stream.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "read", "reference": "John 3:16", "sourceUser": "alice" }
//! ```

use serde::{Deserialize, Serialize};

use crate::request::ReadRequest;

/// Outbound broadcast messages.
///
/// One ordered channel carries all three variants; fan-out preserves the
/// sender's order for every subscriber independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReadEvent {
    /// Present one request.
    Read {
        /// The request to enqueue.
        #[serde(flatten)]
        request: ReadRequest,
    },

    /// Present several requests as sequential enqueues.
    Bulk {
        /// Requests in enqueue order.
        items: Vec<ReadRequest>,
    },

    /// Drop every queued-but-unstarted request on every reader.
    Clear,
}

impl ReadEvent {
    /// Get the event name for logging and wire diagnostics.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Bulk { .. } => "bulk",
            Self::Clear => "clear",
        }
    }
}
