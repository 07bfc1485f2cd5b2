//! JSON-file-backed store for tracked news links.
//!
//! Records are kept in a single JSON document (`{"next_id": N, "links":
//! [...]}`) loaded whole at open and rewritten after each mutation via a
//! temp-file rename, so every insert/update/delete lands atomically.
//!
//! Listing orders by `date_fetched` descending, newest first. Updates are
//! field-level patches carried as a JSON object; date fields accept strict
//! ISO `YYYY-MM-DD` only (deliberately stricter than the lenient
//! multi-format parsing used during ingestion), and a patch with any
//! invalid field is rejected whole, without partial mutation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::models::{NewsLink, NewsLinkDraft};

/// Errors from record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no news link with id {id}")]
    NotFound { id: u64 },
    #[error("invalid date format for {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
    #[error("url must be a non-empty string")]
    EmptyUrl,
    #[error("link store at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// On-disk document shape.
#[derive(Debug, Deserialize, Serialize)]
struct StoreFile {
    next_id: u64,
    links: Vec<NewsLink>,
}

/// The record store. One instance owns one backing file.
#[derive(Debug)]
pub struct LinkStore {
    path: PathBuf,
    next_id: u64,
    links: Vec<NewsLink>,
}

impl LinkStore {
    /// Open the store at `path`, creating an empty one if the file does
    /// not exist yet.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read_to_string(&path).await {
            Ok(text) => {
                serde_json::from_str::<StoreFile>(&text).map_err(|source| StoreError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("store file absent; starting empty");
                StoreFile {
                    next_id: 1,
                    links: Vec::new(),
                }
            }
            Err(e) => return Err(e.into()),
        };
        info!(count = file.links.len(), "opened link store");
        Ok(Self {
            path,
            next_id: file.next_id.max(1),
            links: file.links,
        })
    }

    /// All records, ordered by `date_fetched` descending (newest first),
    /// then by id descending for records fetched the same day.
    pub fn links(&self) -> Vec<&NewsLink> {
        let mut links: Vec<&NewsLink> = self.links.iter().collect();
        links.sort_by(|a, b| {
            b.date_fetched
                .cmp(&a.date_fetched)
                .then(b.id.cmp(&a.id))
        });
        links
    }

    /// Persist a draft as a new record, assigning it the next id.
    ///
    /// Rejects drafts with an empty `url` (the one invariant ingestion
    /// cannot violate but manual entry can).
    #[instrument(level = "info", skip_all)]
    pub async fn create(&mut self, draft: NewsLinkDraft) -> Result<NewsLink, StoreError> {
        if draft.url.trim().is_empty() {
            return Err(StoreError::EmptyUrl);
        }
        let id = self.next_id;
        self.next_id += 1;
        let link = NewsLink::from_draft(id, draft);
        self.links.push(link.clone());
        self.persist().await?;
        info!(id, url = %link.url, "created news link");
        Ok(link)
    }

    /// Apply a field-level patch to the record with the given id.
    ///
    /// Recognized keys: `url`, `date_of_article`, `date_fetched`,
    /// `article_written`, `focus_of_article`; each present key is applied
    /// independently. The whole patch is validated before any field is
    /// touched, so a rejected patch leaves the record unchanged. `null`
    /// clears `date_of_article` and `focus_of_article`; `date_fetched`
    /// can be moved but never cleared.
    #[instrument(level = "info", skip(self, patch))]
    pub async fn update(
        &mut self,
        id: u64,
        patch: &Map<String, Value>,
    ) -> Result<NewsLink, StoreError> {
        let index = self
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or(StoreError::NotFound { id })?;

        // Validate everything up front; nothing is applied on error.
        let url = match patch.get("url") {
            Some(value) => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Some(s.to_string()),
                _ => return Err(StoreError::EmptyUrl),
            },
            None => None,
        };
        let date_of_article = match patch.get("date_of_article") {
            Some(Value::Null) => Some(None),
            Some(value) => Some(Some(parse_iso_date("date_of_article", value)?)),
            None => None,
        };
        let date_fetched = match patch.get("date_fetched") {
            Some(value) => Some(parse_iso_date("date_fetched", value)?),
            None => None,
        };
        let article_written = match patch.get("article_written") {
            Some(value) => match value.as_bool() {
                Some(b) => Some(b),
                None => {
                    warn!(id, "ignoring non-boolean article_written in patch");
                    None
                }
            },
            None => None,
        };
        let focus_of_article = match patch.get("focus_of_article") {
            Some(Value::Null) => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                warn!(id, "ignoring non-string focus_of_article in patch");
                None
            }
            None => None,
        };

        let link = &mut self.links[index];
        if let Some(url) = url {
            link.url = url;
        }
        if let Some(date) = date_of_article {
            link.date_of_article = date;
        }
        if let Some(date) = date_fetched {
            link.date_fetched = date;
        }
        if let Some(written) = article_written {
            link.article_written = written;
        }
        if let Some(focus) = focus_of_article {
            link.focus_of_article = focus;
        }

        let updated = link.clone();
        self.persist().await?;
        info!(id, "updated news link");
        Ok(updated)
    }

    /// Delete the record with the given id, returning the removed record.
    #[instrument(level = "info", skip(self))]
    pub async fn delete(&mut self, id: u64) -> Result<NewsLink, StoreError> {
        let index = self
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or(StoreError::NotFound { id })?;
        let removed = self.links.remove(index);
        self.persist().await?;
        info!(id, "deleted news link");
        Ok(removed)
    }

    /// Rewrite the backing file atomically (write sibling temp, rename).
    async fn persist(&self) -> Result<(), StoreError> {
        let file = StoreFile {
            next_id: self.next_id,
            links: self.links.clone(),
        };
        let json = serde_json::to_string_pretty(&file).expect("store file always serializes");
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Parse a strict ISO `YYYY-MM-DD` patch value.
///
/// This is the update-side validation contract; the lenient multi-format
/// parsing belongs to ingestion only.
pub fn parse_iso_date(field: &'static str, value: &Value) -> Result<NaiveDate, StoreError> {
    let raw = value.as_str().ok_or_else(|| StoreError::InvalidDate {
        field,
        value: value.to_string(),
    })?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| StoreError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}
