//! URL extraction from raw research text.
//!
//! Finds every `http://` / `https://` substring in a response, records the
//! offset where it starts, and revalidates each hit with the `url` crate
//! before handing it on. Extraction is best-effort: candidates that fail
//! revalidation are dropped silently rather than reported as errors.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// A URL found in raw text, together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCandidate {
    /// The URL as matched in the text.
    pub url: String,
    /// Byte offset of the match start within the scanned text.
    pub offset: usize,
}

// Scheme-anchored, then everything up to a whitespace, quote, or
// angle-bracket terminator.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>`]+"#).unwrap());

/// Extract every URL-like substring from `text`, in left-to-right order.
///
/// Each regex hit is re-parsed with [`Url::parse`] and kept only if it has
/// a scheme and a non-empty host. The same URL appearing at two different
/// offsets yields two candidates; deduplication, if any, is the caller's
/// concern.
pub fn extract(text: &str) -> Vec<UrlCandidate> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| match Url::parse(m.as_str()) {
            Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => {
                Some(UrlCandidate {
                    url: m.as_str().to_string(),
                    offset: m.start(),
                })
            }
            _ => {
                debug!(candidate = m.as_str(), offset = m.start(), "dropped unparseable url");
                None
            }
        })
        .collect()
}
