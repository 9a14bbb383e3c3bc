//! Anonymous read-only IRC chat intake.
//!
//! Implements the [`ChatSource`] port against an IRC-style chat host:
//! connect, identify with a throwaway nick, join the configured channel,
//! and surface `PRIVMSG` lines as chat events. The connection reconnects
//! internally with a fixed backoff; the coordinator only sees a
//! `Disconnected` notification per outage.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::sleep;

use lectern_core::ports::{ChatEvent, ChatSource};

/// Default chat host for the monitored channel.
pub const DEFAULT_CHAT_HOST: &str = "irc.chat.twitch.tv:6667";

/// Fixed delay between reconnect attempts.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

struct Conn {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

/// IRC-backed implementation of the chat intake port.
pub struct IrcChatSource {
    host: String,
    channel: String,
    conn: Option<Conn>,
}

impl IrcChatSource {
    /// Create a source for `channel` on `host` (e.g. `"host:6667"`).
    #[must_use]
    pub fn new(host: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            channel: channel.into(),
            conn: None,
        }
    }

    async fn connect(&self) -> std::io::Result<Conn> {
        let stream = TcpStream::connect(&self.host).await?;
        let (read_half, mut writer) = stream.into_split();

        // Anonymous read-only login: a throwaway nick, no password.
        let nick = format!("justinfan{}", rand::thread_rng().gen_range(10_000..100_000));
        writer
            .write_all(format!("NICK {nick}\r\n").as_bytes())
            .await?;
        writer
            .write_all(format!("JOIN #{}\r\n", self.channel).as_bytes())
            .await?;

        tracing::info!(host = %self.host, channel = %self.channel, %nick, "Joined chat");

        Ok(Conn {
            lines: BufReader::new(read_half).lines(),
            writer,
        })
    }
}

#[async_trait]
impl ChatSource for IrcChatSource {
    async fn next_event(&mut self) -> ChatEvent {
        loop {
            if self.conn.is_none() {
                match self.connect().await {
                    Ok(conn) => self.conn = Some(conn),
                    Err(e) => {
                        tracing::warn!(error = %e, "Chat connect failed — retrying");
                        sleep(RECONNECT_BACKOFF).await;
                        continue;
                    }
                }
            }

            let Some(conn) = self.conn.as_mut() else {
                continue;
            };

            match conn.lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(token) = line.strip_prefix("PING") {
                        let reply = format!("PONG{token}\r\n");
                        if let Err(e) = conn.writer.write_all(reply.as_bytes()).await {
                            tracing::warn!(error = %e, "PONG write failed");
                            self.conn = None;
                            return ChatEvent::Disconnected;
                        }
                        continue;
                    }

                    if let Some((user, text)) = parse_privmsg(&line) {
                        return ChatEvent::Message { user, text };
                    }
                    // Joins, capability acks, and other server chatter.
                }
                Ok(None) => {
                    self.conn = None;
                    return ChatEvent::Disconnected;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Chat read failed");
                    self.conn = None;
                    return ChatEvent::Disconnected;
                }
            }
        }
    }
}

/// Parse `:nick!user@host PRIVMSG #channel :message` into (nick, message).
fn parse_privmsg(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(':')?;
    let (prefix, rest) = rest.split_once(' ')?;
    let (command, params) = rest.split_once(' ')?;
    if command != "PRIVMSG" {
        return None;
    }
    let user = prefix.split('!').next()?;
    let (_target, text) = params.split_once(" :")?;
    Some((user.to_string(), text.to_string()))
}
