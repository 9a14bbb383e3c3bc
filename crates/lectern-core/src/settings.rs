//! Settings domain types.
//!
//! Pure configuration structs with no infrastructure dependencies.
//! Env/CLI loading happens in the adapter crates; everything here is
//! optional fields plus `effective_*` accessors with the documented
//! defaults, so partial configuration degrades gracefully.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default HTTP port for the relay API.
pub const DEFAULT_RELAY_PORT: u16 = 4747;

/// Default minimum interval between any two admissions.
pub const DEFAULT_GLOBAL_MIN_INTERVAL_SECS: u64 = 12;

/// Default per-user admission cooldown.
pub const DEFAULT_USER_COOLDOWN_SECS: u64 = 75;

/// Default maximum verse span for a range reference.
pub const DEFAULT_MAX_RANGE_SPAN: u32 = 5;

/// Default idle-keepalive check interval.
pub const DEFAULT_KEEPALIVE_INTERVAL_SECS: u64 = 60;

/// Default quiet gap after which the keepalive fires.
pub const DEFAULT_QUIET_GAP_SECS: u64 = 55;

/// Relay-side settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelaySettings {
    /// Chat channel to monitor. Required: the relay refuses to start
    /// without it.
    pub channel: Option<String>,

    /// HTTP port for the API and SSE stream.
    pub port: Option<u16>,

    /// Pre-shared admin secret for manual injection. When unset, the
    /// relay generates a random token at startup and logs its prefix.
    pub admin_token: Option<String>,

    /// Global admission throttle, seconds.
    pub global_min_interval_secs: Option<u64>,

    /// Per-user admission cooldown, seconds.
    pub user_cooldown_secs: Option<u64>,

    /// Maximum verse span for range references.
    pub max_range_span: Option<u32>,

    /// Idle-keepalive check interval, seconds.
    pub keepalive_interval_secs: Option<u64>,

    /// Quiet gap after which the keepalive injects a filler, seconds.
    pub quiet_gap_secs: Option<u64>,
}

impl RelaySettings {
    /// Get the effective HTTP port.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None => DEFAULT_RELAY_PORT,
        }
    }

    /// Get the effective global throttle interval.
    #[must_use]
    pub const fn effective_global_min_interval(&self) -> Duration {
        Duration::from_secs(match self.global_min_interval_secs {
            Some(secs) => secs,
            None => DEFAULT_GLOBAL_MIN_INTERVAL_SECS,
        })
    }

    /// Get the effective per-user cooldown.
    #[must_use]
    pub const fn effective_user_cooldown(&self) -> Duration {
        Duration::from_secs(match self.user_cooldown_secs {
            Some(secs) => secs,
            None => DEFAULT_USER_COOLDOWN_SECS,
        })
    }

    /// Get the effective maximum range span.
    #[must_use]
    pub const fn effective_max_range_span(&self) -> u32 {
        match self.max_range_span {
            Some(span) => span,
            None => DEFAULT_MAX_RANGE_SPAN,
        }
    }

    /// Get the effective keepalive check interval.
    #[must_use]
    pub const fn effective_keepalive_interval(&self) -> Duration {
        Duration::from_secs(match self.keepalive_interval_secs {
            Some(secs) => secs,
            None => DEFAULT_KEEPALIVE_INTERVAL_SECS,
        })
    }

    /// Get the effective quiet gap.
    #[must_use]
    pub const fn effective_quiet_gap(&self) -> Duration {
        Duration::from_secs(match self.quiet_gap_secs {
            Some(secs) => secs,
            None => DEFAULT_QUIET_GAP_SECS,
        })
    }
}

/// Reader-side presentation timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Pause between two presented items.
    pub inter_item_gap: Duration,

    /// Poll interval while waiting for the unlock gesture.
    pub unlock_poll: Duration,

    /// Watchdog bound on a synthesized utterance.
    pub speech_watchdog: Duration,

    /// Fixed wait when synthesis fails or is unavailable.
    pub synth_fallback: Duration,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            inter_item_gap: Duration::from_secs(1),
            unlock_poll: Duration::from_millis(100),
            speech_watchdog: Duration::from_secs(15),
            synth_fallback: Duration::from_secs(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_relay_settings_fall_back_to_defaults() {
        let settings = RelaySettings::default();
        assert_eq!(settings.effective_port(), DEFAULT_RELAY_PORT);
        assert_eq!(
            settings.effective_global_min_interval(),
            Duration::from_secs(12)
        );
        assert_eq!(settings.effective_user_cooldown(), Duration::from_secs(75));
        assert_eq!(settings.effective_max_range_span(), 5);
        assert_eq!(settings.effective_quiet_gap(), Duration::from_secs(55));
        assert!(settings.channel.is_none());
    }

    #[test]
    fn explicit_values_win() {
        let settings = RelaySettings {
            port: Some(8080),
            global_min_interval_secs: Some(3),
            ..RelaySettings::default()
        };
        assert_eq!(settings.effective_port(), 8080);
        assert_eq!(
            settings.effective_global_min_interval(),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn reader_defaults_match_presentation_contract() {
        let settings = ReaderSettings::default();
        assert_eq!(settings.inter_item_gap, Duration::from_secs(1));
        assert_eq!(settings.unlock_poll, Duration::from_millis(100));
        assert_eq!(settings.speech_watchdog, Duration::from_secs(15));
        assert_eq!(settings.synth_fallback, Duration::from_secs(4));
    }
}
