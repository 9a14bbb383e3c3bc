//! Inbound chat feed port.

use async_trait::async_trait;

/// One notification from the chat feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A user said something. Raw text, unfiltered.
    Message {
        /// Sending user's identifier.
        user: String,
        /// Raw message text.
        text: String,
    },

    /// The upstream connection dropped. The source reconnects internally
    /// with a fixed backoff; this event exists so the coordinator can log
    /// the outage.
    Disconnected,
}

/// Abstract inbound event source for the ingestion coordinator.
///
/// Implementations own their connection lifecycle, including reconnection.
/// `next_event` is cancel-safe from the coordinator's point of view: the
/// coordinator awaits events one at a time and processes each to
/// completion before asking for the next.
#[async_trait]
pub trait ChatSource: Send {
    /// Wait for the next chat notification.
    async fn next_event(&mut self) -> ChatEvent;
}
