//! Unlock gate — blocks all audio output until an explicit user gesture.
//!
//! Browser-style platforms refuse programmatic playback until the user has
//! interacted with the page. The gate models that restriction: it starts
//! locked, flips to unlocked exactly once, and is never reset. The
//! presentation engine suspends cooperatively on a locked gate before
//! producing any sound.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared one-way unlock flag.
///
/// Clones share state, so the session, the engine, and any UI handle all
/// observe the same gesture.
#[derive(Debug, Clone)]
pub struct UnlockGate {
    audio_unlocked: Arc<AtomicBool>,
}

impl UnlockGate {
    /// Create a new gate (initially locked).
    #[must_use]
    pub fn new() -> Self {
        Self {
            audio_unlocked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the gate unlocked. Later calls are no-ops; there is no relock.
    pub fn unlock(&self) {
        if !self.audio_unlocked.swap(true, Ordering::SeqCst) {
            tracing::info!("Audio unlock gesture received");
        }
    }

    /// Check whether audio output is allowed.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.audio_unlocked.load(Ordering::SeqCst)
    }
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_starts_locked() {
        let gate = UnlockGate::new();
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn unlock_is_one_way() {
        let gate = UnlockGate::new();
        gate.unlock();
        assert!(gate.is_unlocked());
        // A second gesture changes nothing.
        gate.unlock();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn gate_clone_shares_state() {
        let gate1 = UnlockGate::new();
        let gate2 = gate1.clone();

        gate1.unlock();
        assert!(gate2.is_unlocked());
    }
}
