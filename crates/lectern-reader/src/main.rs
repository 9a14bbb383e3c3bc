//! Headless reader binary.
//!
//! Subscribes to a relay's event stream and presents each request with
//! clip playback where supplied. Speech synthesis runs the fixed-wait
//! fallback path unless an engine is plugged in; the unlock gate is
//! opened at startup because autoplay restrictions do not bind a
//! server-side process.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use lectern_core::ReaderSettings;
use lectern_reader::{
    HttpPassageLookup, ReaderEvent, ReaderSession, RodioClipPlayer, SseSubscriber,
};

#[derive(Debug, Parser)]
#[command(name = "lectern-reader", about = "Present broadcast read requests aloud")]
struct Cli {
    /// Relay SSE endpoint to subscribe to.
    #[arg(
        long,
        env = "LECTERN_RELAY_URL",
        default_value = "http://127.0.0.1:4747/api/events"
    )]
    relay_url: String,

    /// Passage lookup base URL.
    #[arg(long, env = "LECTERN_LOOKUP_URL", default_value = "https://bible-api.com")]
    lookup_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let lookup = Arc::new(HttpPassageLookup::new(cli.lookup_url));
    let clip = Arc::new(RodioClipPlayer::new());
    let (session, mut events) =
        ReaderSession::new(lookup, clip, None, ReaderSettings::default());

    // Headless process: no user gesture to wait for.
    session.unlock().await;

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ReaderEvent::NowReading { request, up_next } => {
                    tracing::info!(
                        reference = %request.reference,
                        from = %request.source_user,
                        up_next = up_next.as_deref().unwrap_or("-"),
                        "Now reading"
                    );
                }
                ReaderEvent::PlaybackFinished { reference } => {
                    tracing::info!(reference = %reference, "Finished");
                }
                ReaderEvent::QueueCleared { dropped } => {
                    tracing::info!(dropped, "Queue cleared");
                }
                ReaderEvent::AwaitingUnlock | ReaderEvent::Unlocked => {}
            }
        }
    });

    SseSubscriber::new(cli.relay_url).run(session).await;
    Ok(())
}
