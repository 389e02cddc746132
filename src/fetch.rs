//! Async HTTP client wrapping reqwest.
//!
//! One GET per URL, no retries, no status-code gating — a 404 body gets
//! scanned like any other. The single underlying client is shared by every
//! worker so connections can be reused, and the body is read to completion
//! before a worker moves on, which hands the connection back to the pool.

use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Per-URL fetch failure. Never fatal: the worker reports it (verbose mode
/// only) and pulls the next item.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Transport(reqwest::Error),
    #[error("error reading response body: {0}")]
    Body(reqwest::Error),
}

/// HTTP client for the scan pipeline.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client with the given request timeout. With `insecure` set,
    /// TLS certificate verification is skipped.
    pub fn new(timeout_secs: u64, insecure: bool) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Fetch one URL and return the body as text.
    pub async fn get(&self, url: &str) -> std::result::Result<String, FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Transport(e)
            }
        })?;

        resp.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(e)
            }
        })
    }
}
