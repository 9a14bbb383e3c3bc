//! Shared application state type.

use std::sync::Arc;

use tokio::sync::Mutex;

use lectern_core::admission::AdmissionController;
use lectern_core::settings::RelaySettings;

use crate::broadcast::ReadBroadcaster;

/// Everything the API handlers and background tasks share.
pub struct RelayContext {
    /// Fan-out channel for all read events.
    pub broadcaster: Arc<ReadBroadcaster>,

    /// Admission state, serialized behind a mutex shared with the
    /// ingestion loop.
    pub admission: Arc<Mutex<AdmissionController>>,

    /// Effective settings.
    pub settings: RelaySettings,

    /// Source-user identity stamped on fillers and anonymous injections.
    pub identity: String,
}

/// Application state shared across all handlers.
pub type AppState = Arc<RelayContext>;
