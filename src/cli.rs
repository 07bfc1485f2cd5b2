//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. The store path and research API key can be provided via flags or
//! environment variables.

use clap::{Parser, Subcommand};

/// Command-line arguments for the news link ingestion tool.
///
/// # Examples
///
/// ```sh
/// # Research links for two topics and store the results
/// news_link_ingest fetch -t "ai regulation" -t "chip exports"
///
/// # Inspect and curate the store
/// news_link_ingest list
/// news_link_ingest update --id 3 --article-written true
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON file backing the link store
    #[arg(
        short,
        long,
        env = "NEWS_LINK_STORE",
        default_value = "news_links.json",
        global = true
    )]
    pub store: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Research news links for one or more topics and store the results
    Fetch {
        /// Topic to research; repeat the flag for several topics
        #[arg(short, long, required = true)]
        topic: Vec<String>,

        /// Path to the research service YAML config
        #[arg(short, long, default_value = "config.yaml")]
        config: String,

        /// Research service API key (overrides the config file)
        #[arg(long, env = "RESEARCH_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Print all stored links as JSON lines, newest fetch first
    List,

    /// Manually add a single link
    Add {
        /// The article URL
        #[arg(long)]
        url: String,

        /// Publication date, ISO `YYYY-MM-DD`
        #[arg(long)]
        date_of_article: Option<String>,

        /// Topical hint for downstream article generation
        #[arg(long)]
        focus: Option<String>,
    },

    /// Update fields of a stored link
    Update {
        /// Id of the link to update
        #[arg(long)]
        id: u64,

        /// New URL
        #[arg(long)]
        url: Option<String>,

        /// ISO `YYYY-MM-DD`, or `none` to clear
        #[arg(long)]
        date_of_article: Option<String>,

        /// ISO `YYYY-MM-DD` (cannot be cleared)
        #[arg(long)]
        date_fetched: Option<String>,

        /// Mark whether an article has been written from this link
        #[arg(long)]
        article_written: Option<bool>,

        /// Focus text, or `none` to clear
        #[arg(long)]
        focus: Option<String>,
    },

    /// Delete a stored link
    Delete {
        /// Id of the link to delete
        #[arg(long)]
        id: u64,
    },
}
