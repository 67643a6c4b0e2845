//! Tavily search provider.
//!
//! Primary discovery mechanism: general web search whose result URLs are
//! then classified for enrichment. Retry with exponential backoff lives
//! here in the adapter; the workflow core never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::models::SearchHit;

const TAVILY_BASE_URL: &str = "https://api.tavily.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Ranked web search. Failures propagate as fatal to the task that issued
/// the query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError>;
}

/// Tavily Search API client.
pub struct TavilyClient {
    api_key: String,
    client: Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            base_url: TAVILY_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: MAX_RETRIES,
            retry_base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    async fn execute_with_retry(
        &self,
        request: &TavilyRequest<'_>,
    ) -> Result<TavilyResponse, SearchError> {
        let mut last_error = SearchError::Network("no attempts made".to_string());

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying Tavily request");
                tokio::time::sleep(delay).await;
            }

            match self.execute_single(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    warn!(attempt, error = %e, "Tavily request failed, will retry");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn execute_single(
        &self,
        request: &TavilyRequest<'_>,
    ) -> Result<TavilyResponse, SearchError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else if e.is_connect() {
                    SearchError::Connection(e.to_string())
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| SearchError::ParseError(e.to_string()));
        }

        let error_text = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(SearchError::Unauthorized),
            429 => Err(SearchError::RateLimited),
            400 => Err(SearchError::BadRequest(error_text)),
            500..=599 => Err(SearchError::ServerError(status.as_u16(), error_text)),
            _ => Err(SearchError::HttpError(status.as_u16(), error_text)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        debug!(query, max_results, "Tavily search");

        let request = TavilyRequest {
            query,
            max_results: max_results.clamp(1, 20),
            search_depth: "basic",
            include_answer: false,
            include_raw_content: false,
        };

        let response = self.execute_with_retry(&request).await?;

        let hits = response
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                content: r.content,
                score: r.score,
            })
            .collect::<Vec<_>>();

        debug!(query, result_count = hits.len(), "Tavily search complete");
        Ok(hits)
    }
}
