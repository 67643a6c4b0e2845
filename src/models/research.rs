//! Research source types: raw search hits, enrichment records, and the
//! per-task findings aggregate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw ranked result from the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Snippet/content extracted by the provider
    pub content: String,
    /// Relevance score (0-1)
    pub score: f64,
}

/// Extracted arXiv paper metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivPaper {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub published: String,
    /// Canonical abstract-page URL
    pub url: String,
    pub pdf_url: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Extracted Wikipedia article content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiArticle {
    pub title: String,
    pub url: String,
    /// Lead-section summary
    pub summary: String,
    /// Full plain-text article body
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// URLs grouped by the extractor that can enrich them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub papers: Vec<String>,
    pub encyclopedia: Vec<String>,
    pub other: Vec<String>,
}

/// The closed set of source kinds. Merge and formatting sites match on
/// this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "web")]
    Web,
    #[serde(rename = "arxiv")]
    Paper,
    #[serde(rename = "wikipedia")]
    Encyclopedia,
}

impl SourceKind {
    /// Bracketed label used in prompt digests.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Web => "[Web]",
            SourceKind::Paper => "[ArXiv Paper]",
            SourceKind::Encyclopedia => "[Wikipedia]",
        }
    }
}

/// One unified research source after optional enrichment. The URL is the
/// de-duplication key within a findings set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSource {
    #[serde(rename = "source_type")]
    pub kind: SourceKind,
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl EnrichedSource {
    pub fn web(hit: &SearchHit) -> Self {
        let mut metadata = Map::new();
        metadata.insert("score".to_string(), Value::from(hit.score));
        Self {
            kind: SourceKind::Web,
            url: hit.url.clone(),
            title: hit.title.clone(),
            content: hit.content.clone(),
            metadata,
        }
    }

    pub fn paper(paper: &ArxivPaper) -> Self {
        let mut metadata = Map::new();
        metadata.insert("authors".to_string(), Value::from(paper.authors.clone()));
        metadata.insert("published".to_string(), Value::from(paper.published.clone()));
        metadata.insert(
            "categories".to_string(),
            Value::from(paper.categories.clone()),
        );
        Self {
            kind: SourceKind::Paper,
            url: paper.url.clone(),
            title: paper.title.clone(),
            content: paper.summary.clone(),
            metadata,
        }
    }

    pub fn encyclopedia(article: &WikiArticle) -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            "categories".to_string(),
            Value::from(article.categories.clone()),
        );
        Self {
            kind: SourceKind::Encyclopedia,
            url: article.url.clone(),
            title: article.title.clone(),
            content: article.summary.clone(),
            metadata,
        }
    }
}

/// Aggregated output of one research task. Immutable after creation; the
/// orchestrator appends findings in plan-task order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchFindings {
    /// Back-reference to the plan task
    pub task_id: String,
    pub query: String,
    pub sources: Vec<EnrichedSource>,
    #[serde(default)]
    pub papers: Vec<ArxivPaper>,
    #[serde(default)]
    pub articles: Vec<WikiArticle>,
    #[serde(default)]
    pub summary: String,
}
