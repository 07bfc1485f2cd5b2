//! # News Link Ingest
//!
//! A pipeline that asks an external AI research service for recent news
//! links on a topic, recovers `(url, article-date)` pairs from whatever
//! text comes back, and tracks the results as records for downstream
//! article writing.
//!
//! ## Pipeline
//!
//! 1. **Research**: send the topic prompt to the service (with retry and
//!    exponential backoff)
//! 2. **Structured parse**: interpret the response as a JSON array of
//!    `{url, date_of_article}` records
//! 3. **Heuristic fallback**: when the response is not usable JSON, scan
//!    it for URLs and date mentions and pair them by text proximity
//! 4. **Normalize**: parse every raw date through the recognized format
//!    table; unknown formats become absent dates
//! 5. **Store**: persist each record in the JSON-file link store
//!
//! Curation subcommands (`list`, `add`, `update`, `delete`) expose the
//! store for manual upkeep.
//!
//! ## Usage
//!
//! ```sh
//! news_link_ingest fetch -t "ai regulation" --config config.yaml
//! news_link_ingest update --id 3 --article-written true
//! ```

use chrono::Local;
use clap::Parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use serde_json::{Map, Value};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod ingest;
mod models;
mod research;
mod store;
mod utils;

use cli::{Cli, Command};
use models::NewsLinkDraft;
use research::{ResearchClient, RetryPolicy};
use store::LinkStore;
use utils::truncate_for_log;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(store = %args.store, "Parsed CLI arguments");

    let mut store = LinkStore::open(&args.store).await?;

    match args.command {
        Command::Fetch {
            topic,
            config,
            api_key,
        } => fetch_topics(&mut store, topic, &config, api_key).await?,
        Command::List => {
            for link in store.links() {
                println!("{}", serde_json::to_string(link)?);
            }
        }
        Command::Add {
            url,
            date_of_article,
            focus,
        } => {
            let date_of_article = date_of_article
                .map(|raw| store::parse_iso_date("date_of_article", &Value::String(raw)))
                .transpose()?;
            let link = store
                .create(NewsLinkDraft {
                    url,
                    date_of_article,
                    date_fetched: Local::now().date_naive(),
                    article_written: false,
                    focus_of_article: focus,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&link)?);
        }
        Command::Update {
            id,
            url,
            date_of_article,
            date_fetched,
            article_written,
            focus,
        } => {
            let mut patch = Map::new();
            if let Some(url) = url {
                patch.insert("url".to_string(), Value::String(url));
            }
            if let Some(raw) = date_of_article {
                patch.insert("date_of_article".to_string(), clearable(raw));
            }
            if let Some(raw) = date_fetched {
                patch.insert("date_fetched".to_string(), Value::String(raw));
            }
            if let Some(written) = article_written {
                patch.insert("article_written".to_string(), Value::Bool(written));
            }
            if let Some(raw) = focus {
                patch.insert("focus_of_article".to_string(), clearable(raw));
            }
            let link = store.update(id, &patch).await?;
            println!("{}", serde_json::to_string_pretty(&link)?);
        }
        Command::Delete { id } => {
            let removed = store.delete(id).await?;
            info!(id, url = %removed.url, "news link deleted");
        }
    }

    Ok(())
}

/// Map the CLI's `none` sentinel to a clearing null.
fn clearable(raw: String) -> Value {
    if raw == "none" {
        Value::Null
    } else {
        Value::String(raw)
    }
}

/// Research every topic, ingest the responses, and persist the records.
///
/// Topics are researched concurrently (a few at a time); each response is
/// ingested independently, so one garbled or failed topic never affects
/// the others. Store writes happen after collection, serialized.
#[instrument(level = "info", skip_all, fields(topics = topics.len()))]
async fn fetch_topics(
    store: &mut LinkStore,
    topics: Vec<String>,
    config_path: &str,
    api_key: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let config = config::load_config(config_path)?;
    let api_key = api_key
        .or_else(|| config.api_key.clone())
        .ok_or("no research API key: set RESEARCH_API_KEY or api_key in the config")?;
    let client = ResearchClient::new(&config, api_key);
    let policy = RetryPolicy::default();

    let topics: Vec<String> = topics.into_iter().unique().collect();
    let fetched_on = Local::now().date_naive();
    info!(count = topics.len(), %fetched_on, "starting research fetch");

    const PARALLEL_BATCH_SIZE: usize = 4;

    let outcomes: Vec<Option<(String, ingest::IngestOutcome)>> = stream::iter(topics.iter())
        .map(|topic| {
            let client = client.clone();
            let policy = &policy;
            async move {
                let prompt = research::research_links_prompt(topic);
                match research::ask_with_retry(&client, policy, &prompt).await {
                    Ok(raw) => {
                        debug!(
                            topic = %topic,
                            preview = %truncate_for_log(&raw, 300),
                            "raw research response"
                        );
                        Some((topic.clone(), ingest::ingest(&raw, fetched_on)))
                    }
                    Err(e) => {
                        error!(topic = %topic, error = %e, "research call failed; skipping topic");
                        None
                    }
                }
            }
        })
        .buffer_unordered(PARALLEL_BATCH_SIZE)
        .collect()
        .await;

    let mut stored = 0usize;
    for (topic, outcome) in outcomes.into_iter().flatten() {
        info!(
            topic = %topic,
            method = %outcome.method,
            count = outcome.records.len(),
            "topic ingested"
        );
        for draft in outcome.records {
            let link = store.create(draft).await?;
            debug!(id = link.id, url = %link.url, "stored news link");
            stored += 1;
        }
    }

    info!(stored, "research fetch complete");
    Ok(())
}
