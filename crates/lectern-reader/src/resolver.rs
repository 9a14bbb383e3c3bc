//! Content resolution — turns a bare reference into display/speech text.
//!
//! The lookup collaborator may be down, slow, or return an unexpected
//! shape. None of that may surface to the playback loop: resolution
//! always produces *something* to present, falling back to the raw
//! reference itself.

use std::sync::Arc;

use async_trait::async_trait;
use lectern_core::ports::{LookupError, PassageDoc, PassageLookup};

/// Never-failing text resolution over a [`PassageLookup`] port.
pub struct ContentResolver {
    lookup: Arc<dyn PassageLookup>,
}

impl ContentResolver {
    /// Wrap a lookup port.
    #[must_use]
    pub fn new(lookup: Arc<dyn PassageLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve `reference` to presentable text.
    ///
    /// Success with a usable payload yields whitespace-collapsed passage
    /// text; every failure mode yields the raw reference instead. Invoked
    /// at most once per queue item, only when the item arrived without
    /// pre-supplied text.
    pub async fn resolve(&self, reference: &str) -> String {
        match self.lookup.fetch(reference).await {
            Ok(doc) => extract_text(&doc).unwrap_or_else(|| {
                tracing::debug!(reference, "Lookup returned no usable text");
                reference.to_string()
            }),
            Err(e) => {
                tracing::warn!(
                    reference,
                    error = %e,
                    "Passage lookup failed — presenting raw reference"
                );
                reference.to_string()
            }
        }
    }
}

/// Pull presentable text out of a passage document.
///
/// A whole-passage `text` field wins; otherwise segments are joined with
/// single spaces. Empty results count as unusable.
fn extract_text(doc: &PassageDoc) -> Option<String> {
    if let Some(text) = &doc.text {
        let collapsed = collapse_whitespace(text);
        if !collapsed.is_empty() {
            return Some(collapsed);
        }
    }

    let verses = doc.verses.as_ref()?;
    let joined = verses
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let collapsed = collapse_whitespace(&joined);
    (!collapsed.is_empty()).then_some(collapsed)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// HTTP implementation of the passage lookup port.
///
/// GETs `{base}/{url-encoded reference}` and expects a JSON passage
/// document. No internal retries — the resolver's fallback handles
/// everything.
pub struct HttpPassageLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPassageLookup {
    /// Create a lookup client against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PassageLookup for HttpPassageLookup {
    async fn fetch(&self, reference: &str) -> Result<PassageDoc, LookupError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(reference)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        response
            .json::<PassageDoc>()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))
    }
}
