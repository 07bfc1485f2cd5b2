//! The news-link ingestion pipeline.
//!
//! Turns one raw research response into validated link records, in two
//! phases:
//!
//! 1. **Structured**: interpret the response as JSON records
//!    ([`structured`]). A non-empty result is used exclusively.
//! 2. **Heuristic fallback**: scan the text for URLs ([`urls`]) and date
//!    mentions ([`dates`]), then pair each URL with its nearest date by
//!    text offset ([`associate`]).
//!
//! Either way, every raw date string goes through the normalizer
//! ([`dates::normalize`]); a date that matches no known format becomes an
//! absent date, never an error. Malformed upstream text cannot fail an
//! ingestion call: the worst case is an empty record list.
//!
//! The pipeline is a pure transformation over its inputs. It performs no
//! I/O, holds no shared state, and leaves deduplication against previously
//! stored records to the record store.

pub mod associate;
pub mod dates;
pub mod structured;
pub mod urls;

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::models::NewsLinkDraft;
use structured::ParsedResponse;

/// Which path produced an ingestion's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMethod {
    /// Direct JSON interpretation of the response.
    Structured,
    /// Regex extraction plus proximity pairing.
    Heuristic,
}

impl fmt::Display for IngestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestMethod::Structured => write!(f, "structured"),
            IngestMethod::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// The result of one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The extracted records, ready for the store to persist.
    pub records: Vec<NewsLinkDraft>,
    /// Which path produced them (for observability; zero-record outcomes
    /// report the heuristic path, since the fallback also came up empty).
    pub method: IngestMethod,
}

/// Ingest one raw research response.
///
/// Every record in the outcome carries `date_fetched = fetched_on`,
/// `article_written = false`, and no focus. Records sharing a URL are all
/// emitted; merging or rejecting duplicates is the record store's call.
/// An empty outcome is valid and non-exceptional.
#[instrument(level = "info", skip_all, fields(bytes = raw_text.len()))]
pub fn ingest(raw_text: &str, fetched_on: NaiveDate) -> IngestOutcome {
    let (entries, method) = match structured::try_parse(raw_text) {
        ParsedResponse::Structured(entries) => {
            debug!(count = entries.len(), "structured parse succeeded");
            (entries, IngestMethod::Structured)
        }
        ParsedResponse::Unstructured => {
            let candidates = urls::extract(raw_text);
            let mentions = dates::locate(raw_text);
            debug!(
                urls = candidates.len(),
                dates = mentions.len(),
                "falling back to heuristic extraction"
            );
            (
                associate::associate(candidates, &mentions),
                IngestMethod::Heuristic,
            )
        }
    };

    let records: Vec<NewsLinkDraft> = entries
        .into_iter()
        .map(|entry| NewsLinkDraft {
            date_of_article: entry.raw_date.as_deref().and_then(dates::normalize),
            url: entry.url,
            date_fetched: fetched_on,
            article_written: false,
            focus_of_article: None,
        })
        .collect();

    info!(count = records.len(), %method, "ingestion complete");
    IngestOutcome { records, method }
}
