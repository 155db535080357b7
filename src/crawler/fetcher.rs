//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of the scraper:
//! - Building the shared HTTP client
//! - Single-shot GET requests for listing pages
//! - GET requests with exponential backoff for detail pages
//! - Error classification (blocked, unexpected status, network)

use crate::crawler::backoff::{AttemptOutcome, BackoffPolicy, RetrySchedule};
use crate::crawler::headers::random_headers;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    /// A non-success status from a single-shot request
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// A single request failed before a usable response arrived
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every attempt failed
    #[error("Retries exhausted for {url} after {attempts} attempts (last failure: {last})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        blocked: bool,
        last: String,
    },
}

impl FetchError {
    /// True when the last failed attempt was a 403
    pub fn is_blocked(&self) -> bool {
        match self {
            FetchError::RetriesExhausted { blocked, .. } => *blocked,
            FetchError::Status { status, .. } => *status == StatusCode::FORBIDDEN.as_u16(),
            FetchError::Request { .. } => false,
        }
    }
}

/// Builds the HTTP client shared by the whole run
///
/// Headers are set per request, see [`random_headers`].
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends one GET with a fresh randomized header set and a per-request timeout
async fn send_with_headers(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<Response, reqwest::Error> {
    client
        .get(url)
        .headers(random_headers())
        .timeout(timeout)
        .send()
        .await
}

/// Fetches a page once with randomized headers
///
/// Any non-success status is an error.
pub async fn fetch_once(client: &Client, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let response = send_with_headers(client, url, timeout)
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })
}

/// Fetcher for detail pages, retrying with exponential backoff
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return the body |
/// | HTTP 403 | Retry, previous wait doubled on top of the backoff |
/// | Other error status | Retry with an extra `base * 2^attempt` |
/// | Network error / timeout | Retry with an extra `base * 2^attempt` |
/// | Budget exhausted | `FetchError::RetriesExhausted` |
pub struct Fetcher {
    client: Client,
    policy: BackoffPolicy,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(client: Client, policy: BackoffPolicy, timeout: Duration) -> Self {
        Self {
            client,
            policy,
            timeout,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches `url`, sleeping before every attempt
    pub async fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let max_retries = self.policy.max_retries.max(1);
        let mut schedule = RetrySchedule::new(self.policy.clone());
        let mut wait = schedule.initial(self.policy.jitter());
        let mut last_outcome = AttemptOutcome::Transient;
        let mut last_failure = String::new();

        for attempt in 0..max_retries {
            tracing::debug!("Waiting {:?} before attempt {} on {}", wait, attempt + 1, url);
            tokio::time::sleep(wait).await;

            let result = send_with_headers(&self.client, url, self.timeout).await;

            let outcome = match result {
                Ok(response) if response.status().is_success() => match response.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => {
                        last_failure = e.to_string();
                        AttemptOutcome::Transient
                    }
                },
                Ok(response) if response.status() == StatusCode::FORBIDDEN => {
                    tracing::warn!(
                        "403 Forbidden on {} (attempt {}/{})",
                        url,
                        attempt + 1,
                        max_retries
                    );
                    last_failure = "HTTP 403".to_string();
                    AttemptOutcome::Blocked
                }
                Ok(response) => {
                    let status = response.status();
                    tracing::warn!(
                        "HTTP {} on {} (attempt {}/{})",
                        status.as_u16(),
                        url,
                        attempt + 1,
                        max_retries
                    );
                    last_failure = format!("HTTP {}", status.as_u16());
                    AttemptOutcome::Transient
                }
                Err(e) => {
                    tracing::warn!(
                        "Network error on {} (attempt {}/{}): {}",
                        url,
                        attempt + 1,
                        max_retries,
                        e
                    );
                    last_failure = e.to_string();
                    AttemptOutcome::Transient
                }
            };
            last_outcome = outcome;

            if attempt + 1 < max_retries {
                wait = schedule.after_failure(outcome, self.policy.jitter());
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: max_retries,
            blocked: last_outcome == AttemptOutcome::Blocked,
            last: last_failure,
        })
    }
}
