//! Structured interpretation of a research response.
//!
//! The research service is asked for a JSON array of `{url, date_of_article}`
//! objects, but what comes back is only sometimes that: the array may be
//! wrapped in prose or a code fence, collapsed into a single object, or be
//! no JSON at all. This parser makes the structured attempt and signals
//! [`ParsedResponse::Unstructured`] when the text needs the heuristic
//! extraction path instead. Unstructured is the normal fallback trigger,
//! not an error.

use serde_json::Value;
use tracing::{debug, warn};

/// One record recovered from a response, before date normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// The article URL. Always non-empty.
    pub url: String,
    /// The raw date string as the response gave it, if any.
    pub raw_date: Option<String>,
}

/// Outcome of the structured parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// The response yielded at least one usable `{url, ...}` record.
    Structured(Vec<RawEntry>),
    /// Nothing record-like found; run the heuristic extraction path.
    Unstructured,
}

/// Attempt to interpret `text` as structured link records.
///
/// Tries, in order:
/// 1. the entire trimmed text as JSON;
/// 2. if that fails to parse, the substring from the first `[` to the
///    last `]` as JSON (which also digs arrays out of prose and markdown
///    code fences).
///
/// A lone JSON object is coerced to a one-element array. Array elements
/// without a non-empty string `url` field are skipped individually; if no
/// element has one, or nothing array-like parses at all, the result is
/// [`ParsedResponse::Unstructured`].
pub fn try_parse(text: &str) -> ParsedResponse {
    let trimmed = text.trim();

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "response is not JSON as a whole; trying embedded array");
            match embedded_array(trimmed) {
                Some(value) => value,
                None => return ParsedResponse::Unstructured,
            }
        }
    };

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return ParsedResponse::Unstructured,
    };

    let mut entries = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match entry_from_value(item) {
            Some(entry) => entries.push(entry),
            None => warn!(index, "skipping response element without a usable url"),
        }
    }

    if entries.is_empty() {
        ParsedResponse::Unstructured
    } else {
        ParsedResponse::Structured(entries)
    }
}

/// Parse the first `[` ... last `]` substring of `text` as JSON.
fn embedded_array(text: &str) -> Option<Value> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Pull a `{url, raw_date}` pair out of one response element.
///
/// The date is read from `date_of_article`, falling back to `date`; both
/// are optional. Elements that are not objects, or whose `url` is missing,
/// non-string, or empty, yield `None`.
fn entry_from_value(item: &Value) -> Option<RawEntry> {
    let object = item.as_object()?;
    let url = object.get("url")?.as_str()?.trim();
    if url.is_empty() {
        return None;
    }
    let raw_date = object
        .get("date_of_article")
        .or_else(|| object.get("date"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some(RawEntry {
        url: url.to_string(),
        raw_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(parsed: ParsedResponse) -> Vec<RawEntry> {
        match parsed {
            ParsedResponse::Structured(entries) => entries,
            ParsedResponse::Unstructured => panic!("expected structured result"),
        }
    }

    #[test]
    fn test_whole_text_array() {
        let text = r#"[
            {"url": "https://a.com/x", "date_of_article": "01-15-2024"},
            {"url": "https://b.com/y"}
        ]"#;
        let entries = entries(try_parse(text));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://a.com/x");
        assert_eq!(entries[0].raw_date.as_deref(), Some("01-15-2024"));
        assert_eq!(entries[1].raw_date, None);
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let text = r#"Here is what I found:
```json
[{"url": "https://a.com/x", "date_of_article": "2024-01-15"}]
```
Let me know if you need more."#;
        let entries = entries(try_parse(text));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://a.com/x");
    }

    #[test]
    fn test_lone_object_coerced_to_single_element() {
        let text = r#"{"url": "https://a.com/x", "date_of_article": "2024-01-15"}"#;
        let entries = entries(try_parse(text));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://a.com/x");
    }

    #[test]
    fn test_elements_without_url_skipped_individually() {
        let text = r#"[
            {"url": "https://a.com/x", "date_of_article": "01-15-2024"},
            {"date_of_article": "01-16-2024"},
            {"url": ""},
            {"url": "https://c.com/z"}
        ]"#;
        let entries = entries(try_parse(text));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://a.com/x");
        assert_eq!(entries[1].url, "https://c.com/z");
    }

    #[test]
    fn test_no_element_has_url() {
        let text = r#"[{"date_of_article": "01-16-2024"}, {"note": "nothing here"}]"#;
        assert_eq!(try_parse(text), ParsedResponse::Unstructured);
    }

    #[test]
    fn test_free_text_is_unstructured() {
        assert_eq!(
            try_parse("I could not find any relevant articles today."),
            ParsedResponse::Unstructured
        );
    }

    #[test]
    fn test_non_record_json_is_unstructured() {
        assert_eq!(try_parse("42"), ParsedResponse::Unstructured);
        assert_eq!(try_parse(r#""just a string""#), ParsedResponse::Unstructured);
        assert_eq!(try_parse("[]"), ParsedResponse::Unstructured);
    }

    #[test]
    fn test_date_key_fallback() {
        let text = r#"[{"url": "https://a.com/x", "date": "March 3, 2023"}]"#;
        let entries = entries(try_parse(text));
        assert_eq!(entries[0].raw_date.as_deref(), Some("March 3, 2023"));
    }

    #[test]
    fn test_unbalanced_brackets_unstructured() {
        assert_eq!(
            try_parse("an aside ] before any array ["),
            ParsedResponse::Unstructured
        );
    }
}
