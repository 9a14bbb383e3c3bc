//! Ingestion coordinator: chat event → admission → broadcast.
//!
//! One task processes chat events strictly one at a time, so the
//! admission controller's read-then-commit sequence is never interleaved.
//! Rejections are dropped silently (a `debug!` line at most) — the
//! anti-spam posture reports nothing back to the source.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use lectern_core::admission::AdmissionController;
use lectern_core::events::ReadEvent;
use lectern_core::ports::{ChatEvent, ChatSource};

use crate::broadcast::ReadBroadcaster;

/// Run the ingestion loop until the process exits.
pub async fn run(
    mut source: Box<dyn ChatSource>,
    admission: Arc<Mutex<AdmissionController>>,
    broadcaster: Arc<ReadBroadcaster>,
) {
    loop {
        match source.next_event().await {
            ChatEvent::Message { user, text } => {
                let admitted = admission.lock().await.admit(&user, &text, Instant::now());
                match admitted {
                    Ok(request) => {
                        broadcaster.broadcast(ReadEvent::Read { request }).await;
                    }
                    Err(rejection) => {
                        tracing::debug!(%user, reason = %rejection, "Candidate dropped");
                    }
                }
            }
            ChatEvent::Disconnected => {
                tracing::warn!("Chat feed disconnected — source is reconnecting");
            }
        }
    }
}
