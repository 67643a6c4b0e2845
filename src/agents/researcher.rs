//! Researcher agent: executes one plan task end to end.
//!
//! Search, classify, conditionally enrich, merge, then summarize. Sources
//! are de-duplicated by URL during the merge: an enriched record replaces
//! the raw hit with the same URL, and enrichment records whose canonical
//! URL never appeared among the raw hits are appended at the end.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::AgentError;
use crate::llm::{call_as, StructuredModel};
use crate::models::{
    ArxivPaper, EnrichedSource, ResearchFindings, ResearchTask, SearchHit, WikiArticle,
};
use crate::prompts::researcher as prompts;
use crate::tools::{classify, ArticleExtractor, PaperExtractor, SearchProvider};

/// Per-source content cap in the summary digest.
const DIGEST_CONTENT_CHARS: usize = 500;

/// Structured summary returned by the model for one task.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchSummary {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Executes research tasks against the search provider and enrichment
/// extractors.
pub struct ResearcherAgent {
    model: Arc<dyn StructuredModel>,
    search: Arc<dyn SearchProvider>,
    papers: Arc<dyn PaperExtractor>,
    articles: Arc<dyn ArticleExtractor>,
    max_search_results: u32,
}

impl ResearcherAgent {
    pub fn new(
        model: Arc<dyn StructuredModel>,
        search: Arc<dyn SearchProvider>,
        papers: Arc<dyn PaperExtractor>,
        articles: Arc<dyn ArticleExtractor>,
        max_search_results: u32,
    ) -> Self {
        Self {
            model,
            search,
            papers,
            articles,
            max_search_results,
        }
    }

    /// Execute a single research task. Search failures are fatal for the
    /// task; enrichment failures degrade to fewer sources.
    pub async fn execute_task(&self, task: &ResearchTask) -> Result<ResearchFindings, AgentError> {
        info!(task_id = %task.id, query = %task.query, "executing research task");

        let hits = self
            .search
            .search(&task.query, self.max_search_results)
            .await?;
        debug!(result_count = hits.len(), "search complete");

        let urls: Vec<String> = hits.iter().map(|h| h.url.clone()).collect();
        let classified = classify(&urls);
        debug!(
            paper_count = classified.papers.len(),
            encyclopedia_count = classified.encyclopedia.len(),
            other_count = classified.other.len(),
            "urls classified"
        );

        // Enrichment is conditional: no URLs of a class means no call
        let papers = if classified.papers.is_empty() {
            Vec::new()
        } else {
            self.papers.extract_batch(&classified.papers).await
        };
        let articles = if classified.encyclopedia.is_empty() {
            Vec::new()
        } else {
            self.articles.extract_batch(&classified.encyclopedia).await
        };

        let sources = merge_sources(&hits, &papers, &articles);

        let digest = format_sources_digest(&sources);
        let summary: ResearchSummary = call_as(
            self.model.as_ref(),
            prompts::SYSTEM_PROMPT,
            &prompts::user_prompt(&task.query, &task.reasoning, &digest),
            "research_summary",
            &summary_schema(),
        )
        .await?;

        info!(
            task_id = %task.id,
            source_count = sources.len(),
            paper_count = papers.len(),
            article_count = articles.len(),
            "research task complete"
        );

        Ok(ResearchFindings {
            task_id: task.id.clone(),
            query: task.query.clone(),
            sources,
            papers,
            articles,
            summary: summary.summary,
        })
    }
}

/// Build the unified source list. Raw hit order is preserved; each URL
/// appears exactly once.
fn merge_sources(
    hits: &[SearchHit],
    papers: &[ArxivPaper],
    articles: &[WikiArticle],
) -> Vec<EnrichedSource> {
    let papers_by_url: HashMap<&str, &ArxivPaper> =
        papers.iter().map(|p| (p.url.as_str(), p)).collect();
    let articles_by_url: HashMap<&str, &WikiArticle> =
        articles.iter().map(|a| (a.url.as_str(), a)).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for hit in hits {
        if !seen.insert(hit.url.as_str()) {
            continue;
        }
        if let Some(paper) = papers_by_url.get(hit.url.as_str()) {
            sources.push(EnrichedSource::paper(paper));
        } else if let Some(article) = articles_by_url.get(hit.url.as_str()) {
            sources.push(EnrichedSource::encyclopedia(article));
        } else {
            sources.push(EnrichedSource::web(hit));
        }
    }

    // Enrichment can resolve to a canonical URL the search provider never
    // returned; those records become additional sources.
    for paper in papers {
        if seen.insert(paper.url.as_str()) {
            sources.push(EnrichedSource::paper(paper));
        }
    }
    for article in articles {
        if seen.insert(article.url.as_str()) {
            sources.push(EnrichedSource::encyclopedia(article));
        }
    }

    sources
}

/// Format merged sources for the summary prompt, truncating each source's
/// content to keep the prompt bounded.
fn format_sources_digest(sources: &[EnrichedSource]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let content: String = source.content.chars().take(DIGEST_CONTENT_CHARS).collect();
            format!(
                "{}. {} **{}**\n   URL: {}\n   Content: {}...",
                i + 1,
                source.kind.label(),
                source.title,
                source.url,
                content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "Concise summary of findings"
            },
            "key_points": {
                "type": "array",
                "description": "Key points from the research",
                "items": {"type": "string"}
            }
        },
        "required": ["summary", "key_points"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::models::SourceKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hit(url: &str, title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            content: format!("snippet for {}", title),
            score: 0.5,
        }
    }

    fn paper(url: &str) -> ArxivPaper {
        ArxivPaper {
            arxiv_id: "2301.00001".to_string(),
            title: "Enriched Paper".to_string(),
            authors: vec!["Ada".to_string()],
            summary: "Full abstract.".to_string(),
            published: "2023-01-01".to_string(),
            url: url.to_string(),
            pdf_url: format!("{}.pdf", url),
            categories: vec![],
        }
    }

    fn article(url: &str) -> WikiArticle {
        WikiArticle {
            title: "Enriched Article".to_string(),
            url: url.to_string(),
            summary: "Lead section.".to_string(),
            content: "Full body.".to_string(),
            categories: vec![],
        }
    }

    #[test]
    fn test_merge_substitutes_enriched_records() {
        let hits = vec![
            hit("https://arxiv.org/abs/2301.00001", "raw arxiv snippet"),
            hit("https://example.com/page", "plain page"),
        ];
        let papers = vec![paper("https://arxiv.org/abs/2301.00001")];

        let sources = merge_sources(&hits, &papers, &[]);

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, SourceKind::Paper);
        assert_eq!(sources[0].title, "Enriched Paper");
        assert_eq!(sources[1].kind, SourceKind::Web);
    }

    #[test]
    fn test_merge_appends_enrichment_with_canonical_urls() {
        // The extractor resolved to a versioned URL the search provider
        // never returned
        let hits = vec![hit("https://example.com/page", "plain")];
        let papers = vec![paper("https://arxiv.org/abs/2301.00001v2")];
        let articles = vec![article("https://en.wikipedia.org/wiki/Rust")];

        let sources = merge_sources(&hits, &papers, &articles);

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[1].kind, SourceKind::Paper);
        assert_eq!(sources[2].kind, SourceKind::Encyclopedia);
    }

    #[test]
    fn test_merge_never_duplicates_urls() {
        let hits = vec![
            hit("https://example.com/a", "a"),
            hit("https://example.com/a", "a again"),
            hit("https://arxiv.org/abs/2301.00001", "raw"),
        ];
        let papers = vec![paper("https://arxiv.org/abs/2301.00001")];

        let sources = merge_sources(&hits, &papers, &[]);

        let mut urls: Vec<&str> = sources.iter().map(|s| s.url.as_str()).collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), sources.len());
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent_over_same_inputs() {
        let hits = vec![
            hit("https://arxiv.org/abs/2301.00001", "raw"),
            hit("https://example.com/b", "b"),
        ];
        let papers = vec![paper("https://arxiv.org/abs/2301.00001")];

        let first = merge_sources(&hits, &papers, &[]);
        let second = merge_sources(&hits, &papers, &[]);

        assert_eq!(first, second);
    }

    #[test]
    fn test_digest_truncates_long_content() {
        let long_hit = SearchHit {
            title: "Long".to_string(),
            url: "https://example.com".to_string(),
            content: "x".repeat(2000),
            score: 0.9,
        };
        let sources = merge_sources(&[long_hit], &[], &[]);

        let digest = format_sources_digest(&sources);
        assert!(digest.len() < 1000);
        assert!(digest.contains("[Web]"));
    }

    // Scripted collaborators for execute_task tests

    struct FixedSearch {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl SearchProvider for FixedSearch {
        async fn search(&self, _q: &str, _n: u32) -> Result<Vec<SearchHit>, SearchError> {
            Ok(self.hits.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl SearchProvider for FailingSearch {
        async fn search(&self, _q: &str, _n: u32) -> Result<Vec<SearchHit>, SearchError> {
            Err(SearchError::ServerError(500, "down".to_string()))
        }
    }

    struct CountingPaperExtractor {
        calls: AtomicUsize,
        papers: Vec<ArxivPaper>,
    }

    #[async_trait]
    impl PaperExtractor for CountingPaperExtractor {
        async fn extract_batch(&self, _urls: &[String]) -> Vec<ArxivPaper> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.papers.clone()
        }
    }

    struct CountingArticleExtractor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArticleExtractor for CountingArticleExtractor {
        async fn extract_batch(&self, _urls: &[String]) -> Vec<WikiArticle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    struct SummaryModel;

    #[async_trait]
    impl StructuredModel for SummaryModel {
        async fn call(
            &self,
            _system: &str,
            _user: &str,
            _schema_name: &str,
            _schema: &Value,
        ) -> Result<Value, AgentError> {
            Ok(json!({"summary": "synthesized", "key_points": ["a", "b"]}))
        }

        fn name(&self) -> &str {
            "summary-stub"
        }
    }

    fn task() -> ResearchTask {
        ResearchTask::new("task_1", "rust memory safety", "ground claims")
    }

    #[tokio::test]
    async fn test_execute_task_skips_enrichment_without_matching_urls() {
        let papers = Arc::new(CountingPaperExtractor {
            calls: AtomicUsize::new(0),
            papers: vec![],
        });
        let articles = Arc::new(CountingArticleExtractor {
            calls: AtomicUsize::new(0),
        });

        let researcher = ResearcherAgent::new(
            Arc::new(SummaryModel),
            Arc::new(FixedSearch {
                hits: vec![hit("https://example.com/page", "plain")],
            }),
            papers.clone(),
            articles.clone(),
            10,
        );

        let findings = researcher.execute_task(&task()).await.unwrap();

        assert_eq!(papers.calls.load(Ordering::SeqCst), 0);
        assert_eq!(articles.calls.load(Ordering::SeqCst), 0);
        assert_eq!(findings.sources.len(), 1);
        assert_eq!(findings.summary, "synthesized");
    }

    #[tokio::test]
    async fn test_execute_task_enriches_classified_urls() {
        let papers = Arc::new(CountingPaperExtractor {
            calls: AtomicUsize::new(0),
            papers: vec![paper("https://arxiv.org/abs/2301.00001")],
        });
        let articles = Arc::new(CountingArticleExtractor {
            calls: AtomicUsize::new(0),
        });

        let researcher = ResearcherAgent::new(
            Arc::new(SummaryModel),
            Arc::new(FixedSearch {
                hits: vec![hit("https://arxiv.org/abs/2301.00001", "raw snippet")],
            }),
            papers.clone(),
            articles.clone(),
            10,
        );

        let findings = researcher.execute_task(&task()).await.unwrap();

        assert_eq!(papers.calls.load(Ordering::SeqCst), 1);
        assert_eq!(articles.calls.load(Ordering::SeqCst), 0);
        assert_eq!(findings.sources[0].kind, SourceKind::Paper);
        assert_eq!(findings.papers.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_task_search_failure_is_fatal() {
        let researcher = ResearcherAgent::new(
            Arc::new(SummaryModel),
            Arc::new(FailingSearch),
            Arc::new(CountingPaperExtractor {
                calls: AtomicUsize::new(0),
                papers: vec![],
            }),
            Arc::new(CountingArticleExtractor {
                calls: AtomicUsize::new(0),
            }),
            10,
        );

        let err = researcher.execute_task(&task()).await.unwrap_err();
        assert!(matches!(err, AgentError::Search(_)));
    }

    #[tokio::test]
    async fn test_execute_task_keeps_raw_hit_when_enrichment_fails() {
        // Extractor returns nothing for a classified URL: the raw web
        // result survives
        let papers = Arc::new(CountingPaperExtractor {
            calls: AtomicUsize::new(0),
            papers: vec![],
        });

        let researcher = ResearcherAgent::new(
            Arc::new(SummaryModel),
            Arc::new(FixedSearch {
                hits: vec![hit("https://arxiv.org/abs/2301.00001", "raw snippet")],
            }),
            papers.clone(),
            Arc::new(CountingArticleExtractor {
                calls: AtomicUsize::new(0),
            }),
            10,
        );

        let findings = researcher.execute_task(&task()).await.unwrap();

        assert_eq!(papers.calls.load(Ordering::SeqCst), 1);
        assert_eq!(findings.sources.len(), 1);
        assert_eq!(findings.sources[0].kind, SourceKind::Web);
    }
}
