//! Admission control for chat-sourced read requests.
//!
//! Every chat line is a candidate; most are dropped. The controller admits
//! a candidate only when it contains a reference-shaped token, the global
//! throttle window has elapsed, and the sending user is off cooldown.
//! Rejections are silent by design — the anti-spam posture prefers a
//! missed read over a flood or noisy rejection feedback.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::reference;
use crate::request::ReadRequest;

/// Why a candidate was not admitted.
///
/// Callers log these at `debug` at most; nothing is reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The text contains no reference-shaped token.
    #[error("no reference-shaped token")]
    NotAReference,

    /// The global minimum interval between admissions has not elapsed.
    #[error("global throttle window open")]
    GlobalThrottle,

    /// The sending user is still on cooldown.
    #[error("user cooldown active")]
    UserCooldown,
}

/// Admission rate limits and range cap.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Minimum interval between any two admissions, regardless of source.
    pub global_min_interval: Duration,

    /// Minimum interval between two admissions from the same user.
    pub user_cooldown: Duration,

    /// Maximum verse span allowed in a range reference.
    pub max_range_span: u32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            global_min_interval: Duration::from_secs(12),
            user_cooldown: Duration::from_secs(75),
            max_range_span: 5,
        }
    }
}

/// Rate-limit state plus the admit decision.
///
/// State lives for the process lifetime; per-user entries never expire.
/// Callers are expected to serialize `admit` calls (the relay processes
/// chat events one at a time), so no interior locking here.
#[derive(Debug)]
pub struct AdmissionController {
    config: AdmissionConfig,
    last_global: Option<Instant>,
    last_by_user: HashMap<String, Instant>,
}

impl AdmissionController {
    /// Create a controller with empty state.
    #[must_use]
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            last_global: None,
            last_by_user: HashMap::new(),
        }
    }

    /// Decide whether `candidate_text` from `source_user` enters the pipeline.
    ///
    /// Checks run in order: reference shape, global throttle, per-user
    /// cooldown. All checks are pure reads; the two timestamps are written
    /// together only once every check has passed, so an early rejection
    /// never leaves partially-committed throttle state.
    pub fn admit(
        &mut self,
        source_user: &str,
        candidate_text: &str,
        now: Instant,
    ) -> Result<ReadRequest, Rejection> {
        let spaced = reference::normalize_spacing(candidate_text);
        let token = reference::extract(&spaced).ok_or(Rejection::NotAReference)?;

        if let Some(last) = self.last_global {
            if now.saturating_duration_since(last) < self.config.global_min_interval {
                return Err(Rejection::GlobalThrottle);
            }
        }

        if let Some(last) = self.last_by_user.get(source_user) {
            if now.saturating_duration_since(*last) < self.config.user_cooldown {
                return Err(Rejection::UserCooldown);
            }
        }

        self.last_global = Some(now);
        self.last_by_user.insert(source_user.to_string(), now);

        let canonical = reference::canonicalize(token);
        let clamped = reference::clamp_range(&canonical, self.config.max_range_span);

        tracing::debug!(reference = %clamped, user = %source_user, "Admitted read request");
        Ok(ReadRequest::new(clamped, source_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AdmissionController {
        AdmissionController::new(AdmissionConfig::default())
    }

    #[test]
    fn admits_and_canonicalizes() {
        let mut ctl = controller();
        let now = Instant::now();
        let request = ctl.admit("alice", "please read  jOhn   3:16 ", now).unwrap();
        assert_eq!(request.reference, "John 3:16");
        assert_eq!(request.source_user, "alice");
        assert!(request.text.is_none());
    }

    #[test]
    fn admits_compressed_spacing() {
        let mut ctl = controller();
        let request = ctl.admit("alice", "john3:16", Instant::now()).unwrap();
        assert_eq!(request.reference, "John 3:16");
    }

    #[test]
    fn clamps_wide_ranges_on_admission() {
        let mut ctl = controller();
        let request = ctl.admit("alice", "John 3:1-99", Instant::now()).unwrap();
        assert_eq!(request.reference, "John 3:1-6");
    }

    #[test]
    fn rejects_non_references() {
        let mut ctl = controller();
        let err = ctl.admit("alice", "hello friends", Instant::now()).unwrap_err();
        assert_eq!(err, Rejection::NotAReference);
    }

    #[test]
    fn global_throttle_spans_users() {
        let mut ctl = controller();
        let t0 = Instant::now();

        ctl.admit("alice", "John 3:16", t0).unwrap();
        let err = ctl
            .admit("bob", "Psalm 23:1", t0 + Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err, Rejection::GlobalThrottle);

        // Past the 12 s window a different user is admitted.
        ctl.admit("bob", "Psalm 23:1", t0 + Duration::from_secs(13))
            .unwrap();
    }

    #[test]
    fn user_cooldown_outlasts_global_window() {
        let mut ctl = controller();
        let t0 = Instant::now();

        ctl.admit("alice", "John 3:16", t0).unwrap();

        let err = ctl
            .admit("alice", "Luke 2:1", t0 + Duration::from_secs(70))
            .unwrap_err();
        assert_eq!(err, Rejection::UserCooldown);

        ctl.admit("alice", "Luke 2:1", t0 + Duration::from_secs(76))
            .unwrap();
    }

    #[test]
    fn rejection_does_not_touch_throttle_state() {
        let mut ctl = controller();
        let t0 = Instant::now();

        ctl.admit("alice", "John 3:16", t0).unwrap();

        // Bob hits the global throttle at t0+1; that attempt must not
        // start Bob's cooldown.
        ctl.admit("bob", "Psalm 23:1", t0 + Duration::from_secs(1))
            .unwrap_err();

        // At t0+13 the global window is clear and Bob — never admitted —
        // has no cooldown either.
        ctl.admit("bob", "Psalm 23:1", t0 + Duration::from_secs(13))
            .unwrap();
    }

    #[test]
    fn user_rejection_does_not_advance_global_clock() {
        let mut ctl = controller();
        let t0 = Instant::now();

        ctl.admit("alice", "John 3:16", t0).unwrap();

        // Alice retries at t0+13: global window clear, but her own
        // cooldown rejects — and must not reset the global clock.
        ctl.admit("alice", "Luke 2:1", t0 + Duration::from_secs(13))
            .unwrap_err();

        // Bob at t0+14 sees the global clock still anchored at t0.
        ctl.admit("bob", "Psalm 23:1", t0 + Duration::from_secs(14))
            .unwrap();
    }
}
