//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with a stable identifying header set
//! - HEAD probes used by zone discovery
//! - GET requests for listing pages
//!
//! Requests are never retried. Non-2xx responses are returned as a status value;
//! only transport failures become errors.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a fetch or probe
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, body read)
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Status and body of a fetched page
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by discovery and the zone crawler
///
/// Implementations must not retry and must report non-2xx responses as statuses
/// rather than errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a page body with GET
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;

    /// Sends a lightweight existence probe (HEAD) and returns the status code
    async fn probe(&self, url: &str) -> Result<u16, FetchError>;
}

/// Builds an HTTP client carrying the configured identifying headers
///
/// # Example
///
/// ```no_run
/// use tld_price_crawler::config::UserAgentConfig;
/// use tld_price_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    } else {
        tracing::warn!(
            "Ignoring invalid accept-language header: {}",
            config.accept_language
        );
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    probe_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, probe_timeout: Duration) -> Self {
        Self {
            client,
            probe_timeout,
        }
    }

    /// Builds a fetcher from the user agent settings and the two timeouts
    pub fn from_config(
        user_agent: &UserAgentConfig,
        request_timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, request_timeout)?;
        Ok(Self::new(client, probe_timeout))
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        Ok(FetchResponse { status, body })
    }

    async fn probe(&self, url: &str) -> Result<u16, FetchError> {
        let response = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        Ok(response.status().as_u16())
    }
}
