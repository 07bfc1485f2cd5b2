//! Research-service client with retrying delivery.
//!
//! The pipeline's raw text comes from an external AI research service
//! speaking the OpenAI-compatible chat-completions protocol. This module
//! owns that boundary:
//!
//! - [`AskAsync`]: core trait for sending a prompt and getting text back
//! - [`ResearchClient`]: reqwest-based implementation
//! - [`RetryPolicy`] / [`ask_with_retry`]: bounded retries with
//!   exponential backoff and jitter around any [`AskAsync`]
//! - [`research_links_prompt`]: builds the news-link research prompt
//!
//! The parsing core never sees this module; a network failure surfaces to
//! the caller before ingestion is ever invoked.

use rand::{rng, Rng};
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::config::Config;

/// Trait for async prompt/response interaction with the research service.
pub trait AskAsync {
    /// The type of response returned.
    type Response;

    /// Send `text` and receive a response, or an error if the request failed.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// How many times to try a research call, and how long to wait in between.
///
/// The wait before attempt `n + 1` doubles from `base_delay`, is capped at
/// `max_delay`, and gets up to 250ms of random jitter so simultaneous
/// topic fetches don't retry in lockstep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    /// Wait after the first failure; doubles per subsequent failure.
    pub base_delay: StdDuration,
    /// Ceiling on the doubling.
    pub max_delay: StdDuration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: StdDuration::from_secs(1),
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// The wait after `failures` failed attempts (1-based), jitter included.
    fn delay_after(&self, failures: usize) -> StdDuration {
        let doublings = failures.saturating_sub(1).min(16) as u32;
        let backoff = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(doublings))
            .min(self.max_delay);
        backoff + StdDuration::from_millis(rng().random_range(0..=250))
    }
}

/// Send one prompt, retrying per `policy` on failure.
///
/// Transient rate limits and network hiccups are retried until the
/// attempt budget runs out; the final error is returned to the caller,
/// who decides whether the topic is skipped or the run fails.
#[instrument(level = "info", skip_all, fields(max_attempts = policy.max_attempts))]
pub async fn ask_with_retry<A>(
    api: &A,
    policy: &RetryPolicy,
    prompt: &str,
) -> Result<A::Response, Box<dyn Error>>
where
    A: AskAsync,
{
    let started = Instant::now();
    let mut attempt = 1usize;
    loop {
        let err = match api.ask(prompt).await {
            Ok(response) => {
                if attempt > 1 {
                    info!(
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "research call recovered after retrying"
                    );
                }
                return Ok(response);
            }
            Err(e) => e,
        };

        if attempt >= policy.max_attempts {
            error!(
                attempt,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "research call failed; attempt budget exhausted"
            );
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        warn!(
            attempt,
            attempts_left = policy.max_attempts - attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "research call failed; waiting before retry"
        );
        sleep(delay).await;
        attempt += 1;
    }
}

const SYSTEM_PROMPT: &str = "You are a news research assistant. When asked for links, \
respond with a JSON array of objects, each with a \"url\" field and a \"date_of_article\" \
field (the article's publication date). Respond with the JSON only.";

/// Build the research prompt asking for recent news links about `topic`.
pub fn research_links_prompt(topic: &str) -> String {
    format!(
        "Find recent news articles about {topic}. Return a JSON array of objects, \
         one per article, with keys \"url\" and \"date_of_article\"."
    )
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ResearchClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
}

impl fmt::Debug for ResearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // api_key deliberately omitted.
        f.debug_struct("ResearchClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ResearchClient {
    /// Build a client from loaded configuration and a resolved API key.
    pub fn new(config: &Config, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl AskAsync for ResearchClient {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": text},
            ],
        });
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = Value::from(max_tokens);
        }

        let endpoint = format!("{}/chat/completions", self.api_base);
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = serde_json::from_str(&response.text().await?)?;
        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or("research response missing choices[0].message.content")?;

        let dt = t0.elapsed();
        info!(elapsed_ms = dt.as_millis() as u128, bytes = content.len(), "research call returned");
        Ok(content.to_string())
    }
}
