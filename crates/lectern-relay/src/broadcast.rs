//! Broadcast fan-out for admitted and injected read requests.
//!
//! One ordered channel, one sender, independent per-subscriber copies.
//! Consumers that are not connected when an event is sent never receive
//! it — no buffering for late joiners, no retry. The broadcaster also
//! tracks the last-activity instant that the idle keepalive consults.

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use lectern_core::events::ReadEvent;

/// Fan-out of [`ReadEvent`]s to every connected consumer.
///
/// Events are sent via a broadcast channel and streamed to SSE clients.
/// Every subscriber observes the sender's order.
#[derive(Debug)]
pub struct ReadBroadcaster {
    sender: broadcast::Sender<ReadEvent>,
    last_activity: Mutex<Instant>,
}

impl ReadBroadcaster {
    /// Create a broadcaster with the given channel capacity.
    ///
    /// Slow subscribers that fall more than `capacity` events behind miss
    /// the overflowed events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            last_activity: Mutex::new(Instant::now()),
        }
    }

    /// Create a broadcaster with default capacity (256 events).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(256)
    }

    /// Deliver `event` to every currently-connected subscriber and reset
    /// the activity clock.
    ///
    /// A send with no subscribers is fine and silently ignored; there is
    /// nothing to retry and nobody to buffer for.
    pub async fn broadcast(&self, event: ReadEvent) {
        tracing::debug!(
            event = event.event_name(),
            subscribers = self.subscriber_count(),
            "Broadcasting"
        );
        let _ = self.sender.send(event);
        *self.last_activity.lock().await = Instant::now();
    }

    /// Create an SSE response streaming all future events to one client.
    ///
    /// Includes a keep-alive ping every 30 seconds so proxies do not drop
    /// the connection. Lagged/closed receiver errors are logged and the
    /// affected frames skipped.
    pub fn subscribe(
        self: Arc<Self>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
        let receiver = self.sender.subscribe();
        let stream = BroadcastStream::new(receiver).filter_map(|result| match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize event");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "SSE subscriber lagged");
                None
            }
        });

        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(30))
                .text("ping"),
        )
    }

    /// Subscribe directly to the event channel (ingest-side consumers and
    /// tests; SSE clients go through [`subscribe`](Self::subscribe)).
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<ReadEvent> {
        self.sender.subscribe()
    }

    /// Number of currently-connected subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Instant of the most recent broadcast (or construction).
    pub async fn last_activity(&self) -> Instant {
        *self.last_activity.lock().await
    }
}
