//! Reader session — per-consumer playback queue and drain loop.
//!
//! Owns the invariant that at most one request is being presented at a
//! time. The queue and the `playing` flag live behind one mutex, so the
//! loop's "pop or stop" and enqueue's "append or restart" are each a
//! single critical section: an item enqueued while the loop is mid-exit
//! is never stranded, and two loops never drain concurrently.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::time::sleep;

use lectern_core::ReaderSettings;
use lectern_core::events::ReadEvent;
use lectern_core::ports::{ClipPlayer, PassageLookup, SpeechSynth};
use lectern_core::request::ReadRequest;

use crate::engine::{PresentationEngine, ReaderEvent};
use crate::gate::UnlockGate;
use crate::resolver::ContentResolver;

struct QueueState {
    items: VecDeque<ReadRequest>,
    playing: bool,
}

struct SessionInner {
    state: Mutex<QueueState>,
    engine: PresentationEngine,
    resolver: ContentResolver,
    gate: UnlockGate,
    settings: ReaderSettings,
}

/// One connected consumer: queue, resolver, engine, unlock gate.
///
/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ReaderSession {
    inner: Arc<SessionInner>,
}

impl ReaderSession {
    /// Build a session from its ports.
    ///
    /// Returns the session and the receiver for [`ReaderEvent`]s.
    pub fn new(
        lookup: Arc<dyn PassageLookup>,
        clip: Arc<dyn ClipPlayer>,
        synth: Option<Arc<dyn SpeechSynth>>,
        settings: ReaderSettings,
    ) -> (Self, mpsc::UnboundedReceiver<ReaderEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let gate = UnlockGate::new();

        let inner = SessionInner {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                playing: false,
            }),
            engine: PresentationEngine::new(
                gate.clone(),
                clip,
                synth,
                settings.clone(),
                event_tx,
            ),
            resolver: ContentResolver::new(lookup),
            gate,
            settings,
        };

        (
            Self {
                inner: Arc::new(inner),
            },
            event_rx,
        )
    }

    /// Apply one broadcast message from the relay.
    pub async fn apply(&self, event: ReadEvent) {
        match event {
            ReadEvent::Read { request } => self.enqueue(request).await,
            ReadEvent::Bulk { items } => {
                for request in items {
                    self.enqueue(request).await;
                }
            }
            ReadEvent::Clear => self.clear().await,
        }
    }

    /// Append a request and start the drain loop if it is not running.
    pub async fn enqueue(&self, request: ReadRequest) {
        let start_loop = {
            let mut state = self.inner.state.lock().await;
            state.items.push_back(request);
            if state.playing {
                false
            } else {
                state.playing = true;
                true
            }
        };

        if start_loop {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(drain(inner));
        }
    }

    /// Drop every queued-but-unstarted request.
    ///
    /// The item currently presenting (if any) always runs to completion;
    /// only pending queue entries are discarded.
    pub async fn clear(&self) {
        let dropped = {
            let mut state = self.inner.state.lock().await;
            let dropped = state.items.len();
            state.items.clear();
            dropped
        };
        tracing::info!(dropped, "Playback queue cleared");
        self.inner.engine.emit(ReaderEvent::QueueCleared { dropped });
    }

    /// The unlock gesture: flip the gate, hide the prompt, prime the
    /// audio paths so later programmatic playback is not blocked.
    pub async fn unlock(&self) {
        self.inner.gate.unlock();
        self.inner.engine.emit(ReaderEvent::Unlocked);
        self.inner.engine.prime().await;
    }

    /// Handle to the session's unlock gate.
    #[must_use]
    pub fn gate(&self) -> UnlockGate {
        self.inner.gate.clone()
    }

    /// Number of queued (not yet started) items.
    pub async fn pending(&self) -> usize {
        self.inner.state.lock().await.items.len()
    }
}

/// The drain loop: pop, resolve, present, gap, repeat.
///
/// Exits by flipping `playing` off in the same critical section that
/// observed an empty queue.
async fn drain(inner: Arc<SessionInner>) {
    loop {
        let next = {
            let mut state = inner.state.lock().await;
            match state.items.pop_front() {
                Some(item) => {
                    let up_next = state.items.front().map(|r| r.reference.clone());
                    Some((item, up_next))
                }
                None => {
                    state.playing = false;
                    None
                }
            }
        };

        let Some((mut item, up_next)) = next else {
            break;
        };

        // Lazy resolution, at most once per item, only when text is absent.
        if item.text.is_none() {
            item.text = Some(inner.resolver.resolve(&item.reference).await);
        }

        inner.engine.present(&item, up_next).await;

        sleep(inner.settings.inter_item_gap).await;
    }
}
