//! The unit of work flowing through the relay: one read request.

use serde::{Deserialize, Serialize};

/// A single "read this aloud" request.
///
/// Created by the admission controller (from chat) or by a trusted manual
/// injection, broadcast to every connected reader, and discarded once
/// presented. After creation only `text` may change, filled in lazily by
/// the reader-side resolver when the request arrived without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    /// Canonical reference, e.g. `"John 3:16"`. Never empty.
    pub reference: String,

    /// Pre-supplied display/speech text. When absent, the reader resolves
    /// it via the passage lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// URL of a supplied audio clip. When present, playback of the clip
    /// replaces speech synthesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// Who asked for this read (chat user, or the relay identity for
    /// filler and admin injections).
    pub source_user: String,
}

impl ReadRequest {
    /// Build a reference-only request with no pre-supplied content.
    #[must_use]
    pub fn new(reference: impl Into<String>, source_user: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: None,
            audio_url: None,
            source_user: source_user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let request = ReadRequest {
            reference: "John 3:16".to_string(),
            text: None,
            audio_url: Some("https://clips.example/intro.mp3".to_string()),
            source_user: "alice".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"audioUrl\""));
        assert!(json.contains("\"sourceUser\":\"alice\""));
        // Absent text is omitted entirely, not serialized as null.
        assert!(!json.contains("\"text\""));
    }

    #[test]
    fn deserializes_with_missing_optionals() {
        let request: ReadRequest =
            serde_json::from_str(r#"{"reference":"Psalm 23:1","sourceUser":"bob"}"#).unwrap();
        assert_eq!(request.reference, "Psalm 23:1");
        assert!(request.text.is_none());
        assert!(request.audio_url.is_none());
    }
}
