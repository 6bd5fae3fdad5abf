//! HTTP client for the upstream message feed.

use crate::corpus::{FeedPage, RawMessage};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use thiserror::Error;

/// Default location of the member message feed.
pub const DEFAULT_FEED_URL: &str = "https://november7-730026606190.europe-west1.run.app/messages";

const API_KEY_HEADER: &str = "x-api-key";

/// Errors from fetching the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Feed returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse feed: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Where and how to fetch the feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl FeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches raw message records from the feed.
#[derive(Debug, Clone)]
pub struct MessageFeed {
    client: reqwest::Client,
    config: FeedConfig,
}

impl MessageFeed {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            headers.insert(
                API_KEY_HEADER,
                HeaderValue::from_str(key)
                    .map_err(|e| FeedError::Config(format!("Invalid API key: {e}")))?,
            );
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FeedError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Download every record, in feed order.
    pub async fn fetch(&self) -> Result<Vec<RawMessage>, FeedError> {
        tracing::debug!(url = %self.config.url, "fetching message feed");

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status,
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;
        let records = parse_page(&body)?;
        tracing::info!(messages = records.len(), "loaded message feed");
        Ok(records)
    }
}

fn parse_page(body: &str) -> Result<Vec<RawMessage>, FeedError> {
    serde_json::from_str::<FeedPage>(body)
        .map(|page| page.items)
        .map_err(|e| FeedError::Parse(e.to_string()))
}
