//! Data models for tracked news links.
//!
//! This module defines the entities the pipeline produces and the store
//! persists:
//! - [`NewsLink`]: A stored, identified link record
//! - [`NewsLinkDraft`]: An un-identified record produced by ingestion or
//!   manual entry, before the store assigns an id
//!
//! Dates are calendar dates (`chrono::NaiveDate`) with no time or timezone
//! component, and serialize on the wire as ISO `YYYY-MM-DD` strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tracked news link as persisted by the record store.
///
/// # Invariants
///
/// - `url` is never empty once persisted (the store rejects empty URLs).
/// - `date_fetched` is always present; it defaults to the day the record
///   was created.
/// - `article_written` starts `false` and is flipped by an external update
///   once downstream content generation has consumed the link.
///
/// # Wire Shape
///
/// Serializes as an object with keys `id`, `url`, `date_of_article`
/// (ISO date string or null), `date_fetched` (ISO date string),
/// `article_written` (boolean), and `focus_of_article` (string or null).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsLink {
    /// Store-assigned identifier.
    pub id: u64,
    /// The article URL.
    pub url: String,
    /// Best-effort publication date of the source article.
    pub date_of_article: Option<NaiveDate>,
    /// The day this record was created.
    pub date_fetched: NaiveDate,
    /// Whether downstream content generation has consumed this link.
    pub article_written: bool,
    /// Optional user-supplied topical hint.
    pub focus_of_article: Option<String>,
}

/// A news link record before the store has assigned it an identifier.
///
/// Produced in bulk by the ingestion pipeline, or one at a time by the
/// manual-entry path. Field meanings match [`NewsLink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsLinkDraft {
    pub url: String,
    pub date_of_article: Option<NaiveDate>,
    pub date_fetched: NaiveDate,
    pub article_written: bool,
    pub focus_of_article: Option<String>,
}

impl NewsLink {
    /// Materialize a draft into a stored record under the given id.
    pub fn from_draft(id: u64, draft: NewsLinkDraft) -> Self {
        Self {
            id,
            url: draft.url,
            date_of_article: draft.date_of_article,
            date_fetched: draft.date_fetched,
            article_written: draft.article_written,
            focus_of_article: draft.focus_of_article,
        }
    }
}
