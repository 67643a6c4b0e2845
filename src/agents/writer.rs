//! Writer agent: drafts and revises the markdown report.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::AgentError;
use crate::llm::{call_as, StructuredModel};
use crate::models::{FinalReport, ResearchFindings};
use crate::prompts::writer as prompts;

/// Caps applied when formatting findings into the draft prompt.
const ABSTRACT_DIGEST_CHARS: usize = 300;
const AUTHOR_DIGEST_COUNT: usize = 3;

#[derive(Debug, Clone, Deserialize)]
struct ReportDraft {
    title: String,
    content: String,
}

/// Writes the initial draft from aggregated findings and produces full
/// replacement revisions from editor feedback.
pub struct WriterAgent {
    model: Arc<dyn StructuredModel>,
}

impl WriterAgent {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self { model }
    }

    /// Write the first draft. Collects the union of all findings' sources
    /// into the report.
    pub async fn write_report(
        &self,
        question: &str,
        findings: &[ResearchFindings],
    ) -> Result<FinalReport, AgentError> {
        info!(question, finding_count = findings.len(), "writing report");

        let digest = format_findings_digest(findings);
        let draft: ReportDraft = call_as(
            self.model.as_ref(),
            prompts::SYSTEM_PROMPT,
            &prompts::user_prompt(question, &digest),
            "report_draft",
            &draft_schema(),
        )
        .await?;

        info!(
            title = %draft.title,
            content_length = draft.content.len(),
            "report draft complete"
        );

        let sources = findings.iter().flat_map(|f| f.sources.clone()).collect();

        Ok(FinalReport {
            title: draft.title,
            content: draft.content,
            sources,
            iterations: 1,
        })
    }

    /// Revise a report from the editor's brief. The body is a complete
    /// replacement; the source list carries over and `iterations` is
    /// bumped.
    pub async fn revise_report(
        &self,
        question: &str,
        current: &FinalReport,
        feedback: &str,
    ) -> Result<FinalReport, AgentError> {
        info!(
            title = %current.title,
            iteration = current.iterations,
            "revising report"
        );

        let revised: ReportDraft = call_as(
            self.model.as_ref(),
            prompts::SYSTEM_PROMPT,
            &prompts::revision_prompt(question, &current.content, feedback),
            "report_draft",
            &draft_schema(),
        )
        .await?;

        info!(new_title = %revised.title, "revision complete");

        Ok(FinalReport {
            title: revised.title,
            content: revised.content,
            sources: current.sources.clone(),
            iterations: current.iterations + 1,
        })
    }
}

/// Format all findings for the draft prompt: per-task summary, extracted
/// papers and articles, then the full source list.
fn format_findings_digest(findings: &[ResearchFindings]) -> String {
    let mut parts = Vec::new();

    for finding in findings {
        parts.push(format!("## Research Task: {}\n", finding.query));
        parts.push(format!("**Summary**: {}\n", finding.summary));

        if !finding.papers.is_empty() {
            parts.push("\n**ArXiv Papers Found:**".to_string());
            for paper in &finding.papers {
                let authors = paper
                    .authors
                    .iter()
                    .take(AUTHOR_DIGEST_COUNT)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                parts.push(format!("- [{}]({}) by {}", paper.title, paper.url, authors));
                let abstract_digest: String =
                    paper.summary.chars().take(ABSTRACT_DIGEST_CHARS).collect();
                parts.push(format!("  Abstract: {}...", abstract_digest));
            }
        }

        if !finding.articles.is_empty() {
            parts.push("\n**Wikipedia Articles:**".to_string());
            for article in &finding.articles {
                parts.push(format!("- [{}]({})", article.title, article.url));
                let summary_digest: String =
                    article.summary.chars().take(ABSTRACT_DIGEST_CHARS).collect();
                parts.push(format!("  Summary: {}...", summary_digest));
            }
        }

        parts.push("\n**All Sources:**".to_string());
        for source in &finding.sources {
            parts.push(format!(
                "- {} [{}]({})",
                source.kind.label(),
                source.title,
                source.url
            ));
        }

        parts.push("\n---\n".to_string());
    }

    parts.join("\n")
}

fn draft_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Report title"
            },
            "content": {
                "type": "string",
                "description": "Full markdown content of the report"
            }
        },
        "required": ["title", "content"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrichedSource, SearchHit};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        responses: Mutex<Vec<Value>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StructuredModel for ScriptedModel {
        async fn call(
            &self,
            _system: &str,
            user: &str,
            _schema_name: &str,
            _schema: &Value,
        ) -> Result<Value, AgentError> {
            self.prompts.lock().unwrap().push(user.to_string());
            Ok(self.responses.lock().unwrap().remove(0))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn findings() -> Vec<ResearchFindings> {
        let hit = SearchHit {
            title: "Source A".to_string(),
            url: "https://example.com/a".to_string(),
            content: "snippet".to_string(),
            score: 0.8,
        };
        vec![ResearchFindings {
            task_id: "task_1".to_string(),
            query: "rust ownership".to_string(),
            sources: vec![EnrichedSource::web(&hit)],
            papers: vec![],
            articles: vec![],
            summary: "Ownership prevents data races.".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_write_report_starts_at_iteration_one() {
        let model = Arc::new(ScriptedModel::new(vec![
            json!({"title": "Rust Ownership", "content": "# Report"}),
        ]));
        let writer = WriterAgent::new(model);

        let report = writer.write_report("q", &findings()).await.unwrap();

        assert_eq!(report.iterations, 1);
        assert_eq!(report.title, "Rust Ownership");
        assert_eq!(report.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_revise_report_bumps_iterations_and_keeps_sources() {
        let model = Arc::new(ScriptedModel::new(vec![
            json!({"title": "Draft", "content": "v1"}),
            json!({"title": "Revised", "content": "v2"}),
        ]));
        let writer = WriterAgent::new(model);

        let draft = writer.write_report("q", &findings()).await.unwrap();
        let revised = writer
            .revise_report("q", &draft, "fix citations")
            .await
            .unwrap();

        assert_eq!(revised.iterations, 2);
        assert_eq!(revised.content, "v2");
        assert_eq!(revised.sources, draft.sources);
    }

    #[tokio::test]
    async fn test_revision_prompt_contains_draft_and_feedback() {
        let model = Arc::new(ScriptedModel::new(vec![
            json!({"title": "Draft", "content": "the original body"}),
            json!({"title": "Revised", "content": "v2"}),
        ]));
        let writer = WriterAgent::new(model.clone());

        let draft = writer.write_report("q", &findings()).await.unwrap();
        writer
            .revise_report("q", &draft, "**Score**: 5/10")
            .await
            .unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[1].contains("the original body"));
        assert!(prompts[1].contains("**Score**: 5/10"));
    }

    #[test]
    fn test_findings_digest_lists_summary_and_sources() {
        let digest = format_findings_digest(&findings());

        assert!(digest.contains("## Research Task: rust ownership"));
        assert!(digest.contains("Ownership prevents data races."));
        assert!(digest.contains("[Source A](https://example.com/a)"));
    }
}
