//! Scripture reference detection and normalization.
//!
//! Chat text is noisy: references arrive as `"John 3:16"`, `"john3:16-18"`,
//! or buried inside a longer message. This module finds the reference-shaped
//! token, normalizes it to a canonical display form, and caps oversized
//! verse ranges before they reach the broadcast pipeline.

use std::sync::LazyLock;

use regex::Regex;

/// One alphanumeric book word, whitespace, 1-3 digit chapter, `:`,
/// 1-3 digit verse, optional `-` and 1-3 digit end verse.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9]*\s+\d{1,3}:\d{1,3}(?:-\d{1,3})?")
        .expect("reference pattern is valid")
});

/// `<prefix>:<A>-<B>` shape used by [`clamp_range`].
static VERSE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*:)(\d{1,3})-(\d{1,3})$").expect("range pattern is valid")
});

/// Check whether `text` contains a reference-shaped token.
#[must_use]
pub fn detect(text: &str) -> bool {
    REFERENCE.is_match(text)
}

/// Extract the first reference-shaped token from `text`, if any.
///
/// Returns the matched substring verbatim; callers canonicalize it
/// separately so that detection and normalization stay independent.
#[must_use]
pub fn extract(text: &str) -> Option<&str> {
    REFERENCE.find(text).map(|m| m.as_str())
}

/// Insert a single space between a trailing letter and a following digit.
///
/// Handles compressed chat forms like `"john3:16"` so the detector's
/// whitespace requirement still matches.
#[must_use]
pub fn normalize_spacing(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev_alpha = false;
    for ch in text.chars() {
        if prev_alpha && ch.is_ascii_digit() {
            out.push(' ');
        }
        out.push(ch);
        prev_alpha = ch.is_alphabetic();
    }
    out
}

/// Canonicalize a reference for display: lowercase, collapse internal
/// whitespace, trim, then title-case each word.
///
/// Idempotent: `canonicalize(canonicalize(x)) == canonicalize(x)`.
#[must_use]
pub fn canonicalize(reference: &str) -> String {
    let lowered = reference.to_lowercase();
    let mut words = Vec::new();
    for word in lowered.split_whitespace() {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => {
                let mut titled: String = first.to_uppercase().collect();
                titled.push_str(chars.as_str());
                words.push(titled);
            }
            None => continue,
        }
    }
    words.join(" ")
}

/// Cap a verse range at `max_span` verses.
///
/// `"John 3:1-99"` with span 5 becomes `"John 3:1-6"`. References without
/// a range, or with numbers that fail to parse, pass through unchanged.
#[must_use]
pub fn clamp_range(reference: &str, max_span: u32) -> String {
    let Some(caps) = VERSE_RANGE.captures(reference) else {
        return reference.to_string();
    };
    let (Ok(start), Ok(end)) = (caps[2].parse::<u32>(), caps[3].parse::<u32>()) else {
        return reference.to_string();
    };
    if end > start && end - start > max_span {
        format!("{}{}-{}", &caps[1], start, start + max_span)
    } else {
        reference.to_string()
    }
}
