//! arXiv paper extractor.
//!
//! Conditional enrichment for URLs the link classifier marked as papers.
//! One Atom API request covers the whole batch; failures degrade to an
//! empty or partial batch and never abort the research task.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::ArxivPaper;
use crate::tools::link;

const ARXIV_BASE_URL: &str = "https://export.arxiv.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Batch enrichment for paper URLs. Individual URL failures are dropped
/// from the output, never raised.
#[async_trait]
pub trait PaperExtractor: Send + Sync {
    async fn extract_batch(&self, urls: &[String]) -> Vec<ArxivPaper>;
}

/// arXiv Atom API client.
pub struct ArxivClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: ARXIV_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_feed(&self, ids: &[String]) -> Result<Vec<ArxivPaper>, String> {
        let url = format!(
            "{}/api/query?id_list={}&max_results={}",
            self.base_url,
            ids.join(","),
            ids.len()
        );

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("API returned {}", status.as_u16()));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| format!("failed to read body: {}", e))?;

        let feed: AtomFeed =
            quick_xml::de::from_str(&xml).map_err(|e| format!("malformed Atom feed: {}", e))?;

        Ok(feed
            .entries
            .into_iter()
            .filter_map(AtomEntry::into_paper)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(default, rename = "entry")]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    published: String,
    #[serde(default, rename = "author")]
    authors: Vec<AtomAuthor>,
    #[serde(default, rename = "link")]
    links: Vec<AtomLink>,
    #[serde(default, rename = "category")]
    categories: Vec<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(default, rename = "@href")]
    href: String,
    #[serde(default, rename = "@title")]
    title: Option<String>,
    #[serde(default, rename = "@type")]
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(default, rename = "@term")]
    term: String,
}

impl AtomEntry {
    /// Convert a feed entry into a paper record. Entries without a
    /// resolvable paper id (arXiv's in-feed error entries) are dropped.
    fn into_paper(self) -> Option<ArxivPaper> {
        let arxiv_id = link::arxiv_id(&self.id)?;

        let pdf_url = self
            .links
            .iter()
            .find(|l| {
                l.title.as_deref() == Some("pdf")
                    || l.content_type.as_deref() == Some("application/pdf")
            })
            .map(|l| l.href.clone())
            .unwrap_or_else(|| self.id.replace("/abs/", "/pdf/"));

        Some(ArxivPaper {
            arxiv_id,
            title: collapse_whitespace(&self.title),
            authors: self.authors.into_iter().map(|a| a.name).collect(),
            summary: collapse_whitespace(&self.summary),
            published: self.published,
            url: self.id,
            pdf_url,
            categories: self.categories.into_iter().map(|c| c.term).collect(),
        })
    }
}

/// Atom feeds wrap titles and abstracts across indented lines.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl PaperExtractor for ArxivClient {
    async fn extract_batch(&self, urls: &[String]) -> Vec<ArxivPaper> {
        let ids: Vec<String> = urls.iter().filter_map(|u| link::arxiv_id(u)).collect();
        if ids.is_empty() {
            return Vec::new();
        }

        debug!(count = ids.len(), "extracting arXiv papers");

        match self.fetch_feed(&ids).await {
            Ok(papers) => {
                debug!(extracted = papers.len(), "arXiv extraction complete");
                papers
            }
            Err(e) => {
                warn!(error = %e, "arXiv extraction failed, dropping batch");
                Vec::new()
            }
        }
    }
}
