//! Axum handlers for the relay API.
//!
//! Handlers are thin wrappers — each validates its input, performs exactly
//! one broadcast, and returns JSON. Request body shapes are co-located
//! here to keep the handler surface self-contained.

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};

use lectern_core::events::ReadEvent;
use lectern_core::request::ReadRequest;

use crate::error::HttpError;
use crate::state::AppState;

// ── Request body shapes ────────────────────────────────────────────

/// One manually injected item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectItem {
    pub reference: Option<String>,
    pub text: Option<String>,
    pub audio_url: Option<String>,
    pub source_user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub items: Vec<InjectItem>,
}

/// Acknowledgement body for successful injections.
#[derive(Debug, Serialize)]
pub struct InjectAck {
    pub queued: usize,
}

impl InjectItem {
    /// Validate and convert to a [`ReadRequest`].
    ///
    /// Trusted callers' references are trimmed but otherwise passed
    /// verbatim; canonical form is an admission invariant, not a wire
    /// invariant. A missing or empty reference is a validation failure.
    fn into_request(self, default_user: &str) -> Result<ReadRequest, HttpError> {
        let reference = self
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| HttpError::BadRequest("reference is required".to_string()))?;

        Ok(ReadRequest {
            reference,
            text: self.text.filter(|t| !t.trim().is_empty()),
            audio_url: self.audio_url.filter(|u| !u.trim().is_empty()),
            source_user: self
                .source_user
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| default_user.to_string()),
        })
    }
}

// ── Handlers ───────────────────────────────────────────────────────

/// `POST /api/read` — inject one request, bypassing admission.
pub async fn inject(
    State(state): State<AppState>,
    Json(body): Json<InjectItem>,
) -> Result<Json<InjectAck>, HttpError> {
    let request = body.into_request(&state.identity)?;
    tracing::info!(reference = %request.reference, "Manual injection");
    state
        .broadcaster
        .broadcast(ReadEvent::Read { request })
        .await;
    Ok(Json(InjectAck { queued: 1 }))
}

/// `POST /api/bulk` — inject several requests as one ordered batch.
pub async fn bulk(
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<InjectAck>, HttpError> {
    let items = body
        .items
        .into_iter()
        .map(|item| item.into_request(&state.identity))
        .collect::<Result<Vec<_>, _>>()?;

    let queued = items.len();
    tracing::info!(queued, "Bulk injection");
    state.broadcaster.broadcast(ReadEvent::Bulk { items }).await;
    Ok(Json(InjectAck { queued }))
}

/// `POST /api/clear` — empty every consumer's queue.
pub async fn clear(State(state): State<AppState>) -> Result<Json<InjectAck>, HttpError> {
    tracing::info!("Queue clear requested");
    state.broadcaster.broadcast(ReadEvent::Clear).await;
    Ok(Json(InjectAck { queued: 0 }))
}

/// `GET /api/events` — subscribe to the broadcast stream.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    state.broadcaster.clone().subscribe()
}

/// `GET /health` — readiness probe.
pub async fn health_check() -> &'static str {
    "OK"
}
