//! Date normalization and in-text date location.
//!
//! Research responses express article dates in many human formats. This
//! module handles both halves of the problem:
//!
//! - [`normalize`]: Parse a free-form date string into a calendar date, or
//!   give up. Tried against a fixed, ordered table of recognized formats;
//!   the whole trimmed string must match one of them.
//! - [`locate`]: Scan raw text for date-like substrings across all format
//!   families, recording each match's offset so the proximity associator
//!   can pair it with a nearby URL.
//!
//! Month names are English full names and three-letter abbreviations only.
//! No locale inference is attempted.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Recognized date formats, tried in priority order.
///
/// Kept data-driven so a new format is one table entry, not a new code
/// path. chrono's `parse_from_str` rejects trailing input, so each entry
/// must consume the entire trimmed string to match.
const DATE_FORMATS: [&str; 10] = [
    "%m-%d-%Y", // 01-15-2024
    "%m/%d/%Y", // 01/15/2024
    "%Y-%m-%d", // 2024-01-15
    "%Y/%m/%d", // 2024/01/15
    "%B %d, %Y", // January 15, 2024
    "%B %d %Y",  // January 15 2024
    "%b %d, %Y", // Jan 15, 2024
    "%b %d %Y",  // Jan 15 2024
    "%d %B %Y",  // 15 January 2024
    "%d %b %Y",  // 15 Jan 2024
];

/// Parse a free-form date string into a calendar date.
///
/// Returns the first format in [`DATE_FORMATS`] that matches the entire
/// trimmed input, or `None` when nothing matches. Unparseable input is
/// expected (the upstream text is best-effort) and is never an error.
pub fn normalize(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// The pattern family a located date substring matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    /// `MM-DD-YYYY`
    NumericMdyDash,
    /// `MM/DD/YYYY`
    NumericMdySlash,
    /// `YYYY-MM-DD`
    NumericYmdDash,
    /// `YYYY/MM/DD`
    NumericYmdSlash,
    /// `Month DD, YYYY` / `Mon DD YYYY` and comma-less variants
    MonthNameFirst,
    /// `DD Month YYYY` / `DD Mon YYYY`
    DayFirst,
}

/// A date-like substring found in raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMention {
    /// The matched substring, exactly as it appears in the text.
    pub text: String,
    /// Byte offset of the match start within the scanned text.
    pub offset: usize,
    /// Which pattern family produced the match.
    pub family: FormatFamily,
}

const MONTH_NAMES: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

static FAMILY_PATTERNS: Lazy<Vec<(FormatFamily, Regex)>> = Lazy::new(|| {
    vec![
        (
            FormatFamily::NumericMdyDash,
            Regex::new(r"\b\d{1,2}-\d{1,2}-\d{4}\b").unwrap(),
        ),
        (
            FormatFamily::NumericMdySlash,
            Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap(),
        ),
        (
            FormatFamily::NumericYmdDash,
            Regex::new(r"\b\d{4}-\d{1,2}-\d{1,2}\b").unwrap(),
        ),
        (
            FormatFamily::NumericYmdSlash,
            Regex::new(r"\b\d{4}/\d{1,2}/\d{1,2}\b").unwrap(),
        ),
        (
            FormatFamily::MonthNameFirst,
            Regex::new(&format!(r"(?i)\b(?:{MONTH_NAMES})\s+\d{{1,2}},?\s+\d{{4}}\b")).unwrap(),
        ),
        (
            FormatFamily::DayFirst,
            Regex::new(&format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTH_NAMES})\s+\d{{4}}\b")).unwrap(),
        ),
    ]
});

/// Find every date-like substring in `text`.
///
/// All six pattern families are searched independently (a single response
/// routinely mixes formats) and the matches are merged into one list
/// sorted ascending by offset. A mention is a *candidate*: it may still
/// fail [`normalize`] later (e.g. `15-45-2024`), which callers treat as
/// an absent date.
pub fn locate(text: &str) -> Vec<DateMention> {
    let mut mentions = Vec::new();
    for (family, pattern) in FAMILY_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            debug!(family = ?family, offset = m.start(), text = m.as_str(), "located date mention");
            mentions.push(DateMention {
                text: m.as_str().to_string(),
                offset: m.start(),
                family: *family,
            });
        }
    }
    mentions.sort_by_key(|m| m.offset);
    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_all_families_agree() {
        let expected = date(2023, 3, 3);
        for raw in [
            "03-03-2023",
            "03/03/2023",
            "2023-03-03",
            "2023/03/03",
            "March 3, 2023",
            "March 3 2023",
            "Mar 3, 2023",
            "Mar 3 2023",
            "3 March 2023",
            "3 Mar 2023",
        ] {
            assert_eq!(normalize(raw), Some(expected), "failed for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize("  2024-01-15  "), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_normalize_unrecognized_returns_none() {
        assert_eq!(normalize("next Tuesday"), None);
        assert_eq!(normalize("sometime in 2024"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_normalize_rejects_trailing_garbage() {
        // The whole string must match a format, not just a prefix.
        assert_eq!(normalize("2024-01-15 12:00"), None);
        assert_eq!(normalize("on 2024-01-15"), None);
    }

    #[test]
    fn test_normalize_impossible_date_returns_none() {
        assert_eq!(normalize("15-45-2024"), None);
        assert_eq!(normalize("2024-02-30"), None);
    }

    #[test]
    fn test_normalize_iso_is_idempotent() {
        let parsed = normalize("March 3, 2023").unwrap();
        assert_eq!(normalize(&parsed.to_string()), Some(parsed));
    }

    #[test]
    fn test_locate_single_numeric_date() {
        let mentions = locate("published 01-15-2024, worth a read");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].text, "01-15-2024");
        assert_eq!(mentions[0].offset, 10);
        assert_eq!(mentions[0].family, FormatFamily::NumericMdyDash);
    }

    #[test]
    fn test_locate_mixed_families_sorted_by_offset() {
        let text = "first on March 3, 2023 then 2023/04/01 and later 5 Apr 2023";
        let mentions = locate(text);
        assert_eq!(mentions.len(), 3);
        assert_eq!(mentions[0].family, FormatFamily::MonthNameFirst);
        assert_eq!(mentions[1].family, FormatFamily::NumericYmdSlash);
        assert_eq!(mentions[2].family, FormatFamily::DayFirst);
        assert!(mentions[0].offset < mentions[1].offset);
        assert!(mentions[1].offset < mentions[2].offset);
    }

    #[test]
    fn test_locate_iso_not_misread_as_mdy() {
        let mentions = locate("released 2023-03-04.");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].family, FormatFamily::NumericYmdDash);
        assert_eq!(mentions[0].text, "2023-03-04");
    }

    #[test]
    fn test_locate_nothing() {
        assert!(locate("no dates here, just prose").is_empty());
    }

    #[test]
    fn test_located_mentions_normalize() {
        let mentions = locate("both Jan 5, 2024 and 05/01/2024 appear");
        assert_eq!(mentions.len(), 2);
        assert_eq!(normalize(&mentions[0].text), Some(date(2024, 1, 5)));
        assert_eq!(normalize(&mentions[1].text), Some(date(2024, 5, 1)));
    }
}
