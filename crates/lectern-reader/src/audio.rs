//! Supplied-clip playback via `rodio`.
//!
//! Fetches the clip bytes over HTTP, decodes them, and drains a sink to
//! natural end-of-playback on a blocking task so the async presentation
//! loop stays responsive.

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};

use lectern_core::ports::{ClipPlayer, PresentError};

/// `rodio`-backed implementation of the clip playback port.
pub struct RodioClipPlayer {
    client: reqwest::Client,
}

impl RodioClipPlayer {
    /// Create a player using the default output device (opened per clip).
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RodioClipPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipPlayer for RodioClipPlayer {
    async fn play(&self, url: &str) -> Result<(), PresentError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PresentError::Clip(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| PresentError::Clip(e.to_string()))?;

        tracing::debug!(url, len = bytes.len(), "Clip fetched, starting playback");

        // Decode + drain on a blocking thread; `sleep_until_end` blocks
        // until the queue empties.
        tokio::task::spawn_blocking(move || -> Result<(), PresentError> {
            let (_stream, handle) =
                OutputStream::try_default().map_err(|e| PresentError::Clip(e.to_string()))?;
            let sink = Sink::try_new(&handle).map_err(|e| PresentError::Clip(e.to_string()))?;
            let source = Decoder::new(std::io::Cursor::new(bytes))
                .map_err(|e| PresentError::Clip(e.to_string()))?;
            sink.append(source);
            sink.sleep_until_end();
            Ok(())
        })
        .await
        .map_err(|e| PresentError::Clip(e.to_string()))?
    }

    async fn prime(&self) -> Result<(), PresentError> {
        // Opening and immediately dropping an output stream is the silent
        // play/pause cycle platforms want to see after a user gesture.
        tokio::task::spawn_blocking(|| -> Result<(), PresentError> {
            let (_stream, _handle) =
                OutputStream::try_default().map_err(|e| PresentError::Clip(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| PresentError::Clip(e.to_string()))?
    }
}
