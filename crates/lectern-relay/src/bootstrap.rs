//! Composition root — wires settings, broadcaster, admission, keepalive,
//! ingestion, and the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use lectern_core::admission::{AdmissionConfig, AdmissionController};
use lectern_core::ports::ChatSource;
use lectern_core::settings::RelaySettings;

use crate::broadcast::ReadBroadcaster;
use crate::state::{AppState, RelayContext};
use crate::{ingest, keepalive, routes};

/// Source-user identity for fillers and anonymous injections.
pub const RELAY_IDENTITY: &str = "lectern";

/// Information about the running relay.
#[derive(Debug, Clone)]
pub struct RelayInfo {
    /// Port the HTTP server is listening on.
    pub port: u16,
    /// Effective admin token (configured or generated).
    pub token: String,
}

/// Start the relay: HTTP server, keepalive task, and (when a chat source
/// is supplied) the ingestion loop.
///
/// The monitored channel identity is required — its absence is the one
/// fatal startup error in the system. Everything downstream recovers
/// locally.
pub async fn start_relay(
    settings: RelaySettings,
    source: Option<Box<dyn ChatSource>>,
) -> anyhow::Result<(RelayInfo, JoinHandle<()>)> {
    let channel = settings
        .channel
        .clone()
        .filter(|c| !c.trim().is_empty())
        .context("no chat channel configured — set LECTERN_CHANNEL")?;

    let token = settings.admin_token.clone().unwrap_or_else(|| {
        let generated = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            token_prefix = &generated[..8],
            "No admin token configured — generated one"
        );
        generated
    });

    let broadcaster = Arc::new(ReadBroadcaster::with_defaults());

    let admission = Arc::new(Mutex::new(AdmissionController::new(AdmissionConfig {
        global_min_interval: settings.effective_global_min_interval(),
        user_cooldown: settings.effective_user_cooldown(),
        max_range_span: settings.effective_max_range_span(),
    })));

    let state: AppState = Arc::new(RelayContext {
        broadcaster: Arc::clone(&broadcaster),
        admission: Arc::clone(&admission),
        settings: settings.clone(),
        identity: RELAY_IDENTITY.to_string(),
    });

    keepalive::spawn(
        Arc::clone(&broadcaster),
        settings.effective_keepalive_interval(),
        settings.effective_quiet_gap(),
        RELAY_IDENTITY.to_string(),
    );

    if let Some(source) = source {
        tokio::spawn(ingest::run(source, admission, Arc::clone(&broadcaster)));
        tracing::info!(channel = %channel, "Chat ingestion started");
    } else {
        tracing::info!(channel = %channel, "No chat source wired — manual injection only");
    }

    let app = routes::create_router(state, &token);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.effective_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let port = listener
        .local_addr()
        .context("failed to read bound address")?
        .port();

    tracing::info!(port, "Relay API listening");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Relay API server error");
        }
    });

    Ok((RelayInfo { port, token }, handle))
}
