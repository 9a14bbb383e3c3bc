//! Presentation engine — presents one request fully before the next.
//!
//! Per-item state machine:
//!
//! ```text
//!   Displaying → (UnlockWait?) → Playing → Done
//! ```
//!
//! `Displaying` updates the visible state synchronously. `UnlockWait` is
//! entered only while the unlock gate is locked and suspends just this
//! session's loop. `Playing` chooses between a supplied clip (trusted to
//! terminate, no watchdog) and synthesized speech (raced against a
//! watchdog). Every failure mode completes the item locally; nothing here
//! can stall or crash the queue loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::sleep;

use lectern_core::ReaderSettings;
use lectern_core::ports::{ClipPlayer, SpeechSynth};
use lectern_core::request::ReadRequest;

use crate::gate::UnlockGate;

/// Events emitted by the presentation engine to the UI / host layer.
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    /// A new item is on display; `up_next` previews the following queue head.
    NowReading {
        /// The item being presented.
        request: ReadRequest,
        /// Reference of the next queued item, if any.
        up_next: Option<String>,
    },

    /// Presentation is parked until the unlock gesture arrives.
    AwaitingUnlock,

    /// The unlock gesture was received; any unlock prompt should hide.
    Unlocked,

    /// The current item finished (naturally, by fallback, or by watchdog).
    PlaybackFinished {
        /// Reference of the finished item.
        reference: String,
    },

    /// Queued-but-unstarted items were dropped by a clear.
    QueueCleared {
        /// How many pending items were discarded.
        dropped: usize,
    },
}

/// Drives the per-item presentation state machine.
pub struct PresentationEngine {
    gate: UnlockGate,
    clip: Arc<dyn ClipPlayer>,
    synth: Option<Arc<dyn SpeechSynth>>,
    settings: ReaderSettings,
    event_tx: mpsc::UnboundedSender<ReaderEvent>,
}

impl PresentationEngine {
    /// Assemble an engine from its ports and timing settings.
    pub fn new(
        gate: UnlockGate,
        clip: Arc<dyn ClipPlayer>,
        synth: Option<Arc<dyn SpeechSynth>>,
        settings: ReaderSettings,
        event_tx: mpsc::UnboundedSender<ReaderEvent>,
    ) -> Self {
        Self {
            gate,
            clip,
            synth,
            settings,
            event_tx,
        }
    }

    /// Present `request` fully: display, gate wait, audio, done.
    ///
    /// Returns only when the item has reached one of its defined
    /// completions. Never errors — failures are logged and absorbed.
    pub async fn present(&self, request: &ReadRequest, up_next: Option<String>) {
        // Displaying: synchronous visible-state update, always succeeds.
        self.emit(ReaderEvent::NowReading {
            request: request.clone(),
            up_next,
        });

        // UnlockWait: cooperative suspension until the gesture arrives.
        if !self.gate.is_unlocked() {
            self.emit(ReaderEvent::AwaitingUnlock);
            while !self.gate.is_unlocked() {
                sleep(self.settings.unlock_poll).await;
            }
        }

        // Playing.
        if let Some(url) = &request.audio_url {
            self.play_clip(url).await;
        } else {
            let text = request
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(&request.reference);
            self.speak(text).await;
        }

        // Done.
        self.emit(ReaderEvent::PlaybackFinished {
            reference: request.reference.clone(),
        });
    }

    /// Play a supplied clip to its natural end.
    ///
    /// A clip is trusted to terminate, so there is no watchdog; a start
    /// failure completes the item immediately with no retry.
    async fn play_clip(&self, url: &str) {
        if let Err(e) = self.clip.play(url).await {
            tracing::warn!(url, error = %e, "Clip playback failed — advancing");
        }
    }

    /// Synthesize speech, racing natural completion against the watchdog.
    async fn speak(&self, text: &str) {
        let Some(synth) = &self.synth else {
            // No synthesis capability at all: fixed wait is the whole
            // presentation.
            sleep(self.settings.synth_fallback).await;
            return;
        };

        synth.cancel();

        tokio::select! {
            result = synth.speak(text) => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Speech synthesis failed — fixed fallback wait");
                    sleep(self.settings.synth_fallback).await;
                }
            }
            () = sleep(self.settings.speech_watchdog) => {
                tracing::debug!(chars = text.len(), "Speech watchdog fired — cutting utterance");
                synth.cancel();
            }
        }
    }

    /// Best-effort priming of both audio paths after the unlock gesture.
    pub async fn prime(&self) {
        if let Err(e) = self.clip.prime().await {
            tracing::debug!(error = %e, "Clip priming failed (ignored)");
        }
        if let Some(synth) = &self.synth {
            if let Err(e) = synth.prime().await {
                tracing::debug!(error = %e, "Synth priming failed (ignored)");
            }
        }
    }

    /// Emit a reader event (best-effort — a dropped receiver is logged once
    /// per send and presentation continues).
    pub(crate) fn emit(&self, event: ReaderEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Reader event receiver dropped");
        }
    }
}
