//! Wikipedia article extractor.
//!
//! Conditional enrichment for URLs the link classifier marked as
//! encyclopedia articles, backed by the MediaWiki Action API. Failures
//! drop the affected article and never abort the research task.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::WikiArticle;
use crate::tools::link;

const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_CATEGORIES: usize = 10;

/// Batch enrichment for encyclopedia URLs. Individual URL failures are
/// dropped from the output, never raised.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract_batch(&self, urls: &[String]) -> Vec<WikiArticle>;
}

/// MediaWiki Action API client.
pub struct WikipediaClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: WIKIPEDIA_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_article(&self, title: &str) -> Result<Option<WikiArticle>, String> {
        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .timeout(self.timeout)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts|categories"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("cllimit", "50"),
                ("titles", title),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("API returned {}", status.as_u16()));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed API response: {}", e))?;

        let page = match body.query.and_then(|q| q.pages.into_values().next()) {
            Some(page) => page,
            None => return Ok(None),
        };

        if page.missing.is_some() {
            return Ok(None);
        }

        let (title, extract) = match (page.title, page.extract) {
            (Some(title), Some(extract)) => (title, extract),
            _ => return Ok(None),
        };

        let categories = page
            .categories
            .into_iter()
            .map(|c| c.title.trim_start_matches("Category:").to_string())
            .take(MAX_CATEGORIES)
            .collect();

        let url = format!(
            "{}/wiki/{}",
            self.base_url,
            urlencoding::encode(&title.replace(' ', "_"))
        );

        Ok(Some(WikiArticle {
            title,
            url,
            summary: lead_section(&extract),
            content: extract,
            categories,
        }))
    }
}

/// The text before the first blank line: the article's lead section.
fn lead_section(extract: &str) -> String {
    extract
        .split("\n\n")
        .next()
        .unwrap_or(extract)
        .trim()
        .to_string()
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: Option<String>,
    extract: Option<String>,
    #[serde(default)]
    categories: Vec<Category>,
    missing: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(default)]
    title: String,
}

#[async_trait]
impl ArticleExtractor for WikipediaClient {
    async fn extract_batch(&self, urls: &[String]) -> Vec<WikiArticle> {
        let mut articles = Vec::new();

        for url in urls {
            let title = match link::wikipedia_title(url) {
                Some(title) => title.replace('_', " "),
                None => continue,
            };

            debug!(title, "extracting Wikipedia article");

            match self.fetch_article(&title).await {
                Ok(Some(article)) => articles.push(article),
                Ok(None) => warn!(title, "Wikipedia article not found, dropping"),
                Err(e) => warn!(title, error = %e, "Wikipedia extraction failed, dropping"),
            }
        }

        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_page() -> serde_json::Value {
        json!({
            "query": {
                "pages": {
                    "12345": {
                        "pageid": 12345,
                        "title": "Machine learning",
                        "extract": "Machine learning is a field of study.\n\nIt grew out of AI research.",
                        "categories": [
                            {"ns": 14, "title": "Category:Machine learning"},
                            {"ns": 14, "title": "Category:Cybernetics"}
                        ]
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn test_extract_batch_parses_article() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("titles", "Machine learning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_page()))
            .mount(&server)
            .await;

        let client = WikipediaClient::new().with_base_url(server.uri());
        let articles = client
            .extract_batch(&["https://en.wikipedia.org/wiki/Machine_learning".to_string()])
            .await;

        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.title, "Machine learning");
        assert_eq!(article.summary, "Machine learning is a field of study.");
        assert!(article.content.contains("AI research"));
        assert_eq!(article.categories, vec!["Machine learning", "Cybernetics"]);
        assert!(article.url.ends_with("/wiki/Machine_learning"));
    }

    #[tokio::test]
    async fn test_extract_batch_drops_missing_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"pages": {"-1": {"title": "Nope", "missing": ""}}}
            })))
            .mount(&server)
            .await;

        let client = WikipediaClient::new().with_base_url(server.uri());
        let articles = client
            .extract_batch(&["https://en.wikipedia.org/wiki/Nope".to_string()])
            .await;

        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_extract_batch_survives_per_url_failure() {
        let server = MockServer::start().await;
        // First title errors, second succeeds
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("titles", "Broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("titles", "Machine learning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_page()))
            .mount(&server)
            .await;

        let client = WikipediaClient::new().with_base_url(server.uri());
        let articles = client
            .extract_batch(&[
                "https://en.wikipedia.org/wiki/Broken".to_string(),
                "https://en.wikipedia.org/wiki/Machine_learning".to_string(),
            ])
            .await;

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Machine learning");
    }

    #[tokio::test]
    async fn test_extract_batch_skips_unparseable_urls() {
        let client = WikipediaClient::new().with_base_url("http://127.0.0.1:1");
        let articles = client
            .extract_batch(&["https://example.com/page".to_string()])
            .await;

        assert!(articles.is_empty());
    }

    #[test]
    fn test_lead_section_takes_first_paragraph() {
        assert_eq!(lead_section("Intro text.\n\nMore detail."), "Intro text.");
        assert_eq!(lead_section("Only paragraph."), "Only paragraph.");
        assert_eq!(lead_section(""), "");
    }
}
