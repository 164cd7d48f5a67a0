//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a run, including:
//! - Building the HTTP client with timeout, user agent and default headers
//! - A bounded retry loop with a fixed delay between attempts
//! - Pacing successive requests so the remote host sees at most one request
//!   per configured delay
//! - Error classification

use crate::config::ScrapingConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why the last attempt of a fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request exceeded the configured timeout
    Timeout,
    /// Connection refused, DNS failure, TLS error, truncated body, ...
    Connection(String),
    /// The server answered with a non-2xx status
    HttpStatus(u16),
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("request timed out"),
            Self::Connection(message) => write!(f, "connection error: {}", message),
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
        }
    }
}

/// Terminal failure of a fetch after all attempts were used
#[derive(Debug, Clone, Error)]
#[error("failed to fetch {url} after {attempts} attempt(s): {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
    pub attempts: u32,
}

/// A successfully fetched response body
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The request behavior configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. invalid proxy)
pub fn build_http_client(config: &ScrapingConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true);

    if let Some(proxy_url) = &config.proxy_url {
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Issues GET requests with retry and politeness delay
///
/// A fetcher belongs to exactly one run. The pacing state lives on the
/// fetcher itself, so independent runs never wait on each other.
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    delay: Duration,
    last_request: Option<Instant>,
}

impl Fetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &ScrapingConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around an existing client
    ///
    /// The client's own timeout is used as the per-request timeout.
    pub fn with_client(client: Client, config: &ScrapingConfig) -> Self {
        Self {
            client,
            max_attempts: config.max_retries.max(1),
            delay: config.delay(),
            last_request: None,
        }
    }

    /// Maximum number of attempts per fetch
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return body |
    /// | Non-2xx | Retry after delay |
    /// | Timeout | Retry after delay |
    /// | Connection / body error | Retry after delay |
    /// | Attempts exhausted | Return `FetchError` with the last failure |
    ///
    /// Every request, including the first one, waits until at least the
    /// configured delay has passed since the previous request finished.
    pub async fn fetch(&mut self, url: &str) -> Result<FetchedBody, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.wait_for_slot().await;

            let outcome = self.attempt(url).await;
            self.last_request = Some(Instant::now());

            match outcome {
                Ok(fetched) => {
                    tracing::debug!(
                        url,
                        attempt,
                        status = fetched.status,
                        bytes = fetched.body.len(),
                        "Fetched page"
                    );
                    return Ok(fetched);
                }
                Err(kind) if attempt < self.max_attempts => {
                    tracing::warn!(
                        url,
                        attempt,
                        max_attempts = self.max_attempts,
                        "Fetch failed ({}), retrying in {:?}",
                        kind,
                        self.delay
                    );
                }
                Err(kind) => {
                    tracing::warn!(url, attempt, "Fetch failed ({}), giving up", kind);
                    return Err(FetchError {
                        url: url.to_string(),
                        kind,
                        attempts: attempt,
                    });
                }
            }
        }
    }

    /// Performs a single GET without retrying
    async fn attempt(&self, url: &str) -> Result<FetchedBody, FetchErrorKind> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchErrorKind::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| classify_error(&e))?;

        Ok(FetchedBody {
            final_url,
            status: status.as_u16(),
            body,
        })
    }

    /// Sleeps until the configured delay has elapsed since the last request
    async fn wait_for_slot(&self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
    }
}

/// Maps a reqwest error onto the fetch taxonomy
fn classify_error(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else {
        FetchErrorKind::Connection(error.to_string())
    }
}
