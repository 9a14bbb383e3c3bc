//! Audio presentation ports: supplied-clip playback and speech synthesis.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the presentation backends.
///
/// The presentation engine recovers from every variant locally — a failed
/// item completes immediately or falls back to a fixed wait; the queue
/// loop never sees these.
#[derive(Debug, Error)]
pub enum PresentError {
    /// The clip could not be fetched or decoded.
    #[error("clip playback failed: {0}")]
    Clip(String),

    /// Speech synthesis could not start or aborted mid-utterance.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

/// Port for playing a supplied audio clip.
///
/// `play` resolves at natural end-of-playback; a supplied clip is trusted
/// to terminate, so the engine applies no watchdog to this path.
#[async_trait]
pub trait ClipPlayer: Send + Sync {
    /// Fetch and play the clip at `url`, returning when playback ends.
    async fn play(&self, url: &str) -> Result<(), PresentError>;

    /// Best-effort silent warm-up after the unlock gesture, so later
    /// programmatic playback is not blocked by platform restrictions.
    /// Failures are ignored by the caller.
    async fn prime(&self) -> Result<(), PresentError> {
        Ok(())
    }
}

/// Port for synthesized speech.
///
/// `speak` resolves at natural end of the utterance; the engine races it
/// against a watchdog, and calls `cancel` before every new utterance.
#[async_trait]
pub trait SpeechSynth: Send + Sync {
    /// Cancel any in-flight utterance. Idempotent.
    fn cancel(&self);

    /// Speak `text`, returning when the utterance completes.
    async fn speak(&self, text: &str) -> Result<(), PresentError>;

    /// Best-effort warm-up after the unlock gesture. Failures are ignored.
    async fn prime(&self) -> Result<(), PresentError> {
        Ok(())
    }
}
