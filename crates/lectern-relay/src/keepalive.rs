//! Idle keepalive — filler reads while viewers are connected but chat is quiet.
//!
//! A periodic check that fires only when at least one consumer is
//! connected and nothing has been broadcast within the quiet gap. Every
//! broadcast path (organic admission, manual injection, and the filler
//! itself) resets the shared activity clock, so one quiet stream produces
//! at most one filler per gap.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::task::JoinHandle;

use lectern_core::events::ReadEvent;
use lectern_core::request::ReadRequest;

use crate::broadcast::ReadBroadcaster;

/// Fixed filler set for idle periods.
pub const FILLER_REFERENCES: &[&str] = &[
    "John 3:16",
    "Psalm 23:1",
    "Genesis 1:1",
    "Proverbs 3:5-6",
    "Romans 8:28",
];

/// Spawn the keepalive task.
///
/// `identity` is the relay's own source-user name stamped on fillers.
pub fn spawn(
    broadcaster: Arc<ReadBroadcaster>,
    interval: Duration,
    quiet_gap: Duration,
    identity: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so startup is not
        // treated as an idle period.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if broadcaster.subscriber_count() == 0 {
                continue;
            }

            let idle = broadcaster.last_activity().await.elapsed();
            if idle < quiet_gap {
                continue;
            }

            let reference = FILLER_REFERENCES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or("John 3:16");

            tracing::info!(
                reference,
                idle_secs = idle.as_secs(),
                "Quiet stream — broadcasting filler read"
            );
            broadcaster
                .broadcast(ReadEvent::Read {
                    request: ReadRequest::new(reference, identity.clone()),
                })
                .await;
        }
    })
}
