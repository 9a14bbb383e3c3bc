//! External passage lookup port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One verse-sized segment of a passage payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageSegment {
    /// Segment text.
    pub text: String,
}

/// The lookup collaborator's response shape.
///
/// The collaborator returns either a single `text` field or an ordered
/// list of segments; both may be present, in which case `text` wins.
/// Anything else is treated as unresolvable by the resolver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassageDoc {
    /// Whole-passage text, when the collaborator sends one.
    #[serde(default)]
    pub text: Option<String>,

    /// Ordered verse segments, when the collaborator sends a list.
    #[serde(default)]
    pub verses: Option<Vec<PassageSegment>>,
}

/// Errors from the lookup collaborator.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("lookup transport error: {0}")]
    Transport(String),

    /// The collaborator answered with a non-success status.
    #[error("lookup returned status {0}")]
    Status(u16),

    /// The response body did not parse as a passage document.
    #[error("malformed lookup response: {0}")]
    Malformed(String),
}

/// Port for fetching passage text by canonical reference.
///
/// Implemented by the reader's HTTP client; mocked in tests. The resolver
/// turns every error from this port into a raw-reference fallback, so
/// implementations should not retry internally.
#[async_trait]
pub trait PassageLookup: Send + Sync {
    /// Fetch the passage document for `reference`.
    async fn fetch(&self, reference: &str) -> Result<PassageDoc, LookupError>;
}
