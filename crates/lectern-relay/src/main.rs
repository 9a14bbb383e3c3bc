//! Relay binary: chat intake → admission → broadcast, plus the admin API.

use anyhow::Result;
use clap::Parser;

use lectern_core::ports::ChatSource;
use lectern_core::settings::RelaySettings;
use lectern_relay::{DEFAULT_CHAT_HOST, IrcChatSource, start_relay};

#[derive(Debug, Parser)]
#[command(name = "lectern-relay", about = "Relay chat scripture references to readers")]
struct Cli {
    /// Chat channel to monitor (required).
    #[arg(long, env = "LECTERN_CHANNEL")]
    channel: Option<String>,

    /// Chat host to connect to.
    #[arg(long, env = "LECTERN_CHAT_HOST", default_value = DEFAULT_CHAT_HOST)]
    chat_host: String,

    /// HTTP port for the API and SSE stream.
    #[arg(long, env = "LECTERN_PORT")]
    port: Option<u16>,

    /// Pre-shared admin secret for manual injection.
    #[arg(long, env = "LECTERN_ADMIN_TOKEN")]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = RelaySettings {
        channel: cli.channel,
        port: cli.port,
        admin_token: cli.admin_token,
        ..RelaySettings::default()
    };

    let source: Option<Box<dyn ChatSource>> = settings
        .channel
        .as_deref()
        .map(|channel| Box::new(IrcChatSource::new(cli.chat_host.clone(), channel)) as Box<dyn ChatSource>);

    let (info, handle) = start_relay(settings, source).await?;
    tracing::info!(port = info.port, "Relay up");

    handle.await?;
    Ok(())
}
