//! SSE subscription to the relay's broadcast stream.
//!
//! The transport contract is a reliable ordered broadcast with
//! at-most-once delivery: on disconnect the subscriber retries with a
//! fixed backoff and receives nothing that was broadcast while away.

use std::time::Duration;

use futures_util::StreamExt;
use thiserror::Error;
use tokio::time::sleep;

use lectern_core::events::ReadEvent;

use crate::session::ReaderSession;

/// Default reconnect delay after a dropped stream.
pub const DEFAULT_RECONNECT_BACKOFF: Duration = Duration::from_secs(3);

/// Transport-level subscription errors (all retried, never fatal).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connect/read failure or non-success status.
    #[error("event stream error: {0}")]
    Stream(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Stream(e.to_string())
    }
}

/// Subscribes to the relay's SSE endpoint and feeds events to a session.
pub struct SseSubscriber {
    client: reqwest::Client,
    url: String,
    backoff: Duration,
}

impl SseSubscriber {
    /// Create a subscriber for the given events URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            backoff: DEFAULT_RECONNECT_BACKOFF,
        }
    }

    /// Subscribe forever, reconnecting with a fixed backoff.
    ///
    /// Never returns; disconnects are logged and retried.
    pub async fn run(self, session: ReaderSession) {
        loop {
            match self.stream_once(&session).await {
                Ok(()) => tracing::info!("Event stream ended — reconnecting"),
                Err(e) => tracing::warn!(error = %e, "Event stream failed — reconnecting"),
            }
            sleep(self.backoff).await;
        }
    }

    /// One connection lifetime: read `data:` frames until the stream ends.
    async fn stream_once(&self, session: &ReaderSession) -> Result<(), TransportError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(url = %self.url, "Subscribed to event stream");

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buffer.find('\n') {
                let line: String = buffer.drain(..=pos).collect();
                handle_line(line.trim_end(), session).await;
            }
        }

        Ok(())
    }
}

/// Dispatch one SSE line. Non-`data:` lines (comments, keep-alive pings,
/// blank separators) are ignored; unparseable payloads are logged and
/// skipped so one bad frame cannot take the subscriber down.
async fn handle_line(line: &str, session: &ReaderSession) {
    let Some(payload) = line
        .strip_prefix("data: ")
        .or_else(|| line.strip_prefix("data:"))
    else {
        return;
    };

    match serde_json::from_str::<ReadEvent>(payload) {
        Ok(event) => {
            tracing::debug!(event = event.event_name(), "Broadcast event received");
            session.apply(event).await;
        }
        Err(e) => {
            tracing::debug!(error = %e, payload, "Skipping unparseable event frame");
        }
    }
}
