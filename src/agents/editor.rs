//! Editor agent: reviews drafts and produces the revision brief.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::error::AgentError;
use crate::llm::{call_as, StructuredModel};
use crate::models::EditorFeedback;
use crate::prompts::editor as prompts;

/// Reviews report drafts against the original question, returning an
/// approval flag, a 1-10 score, and concrete issues/suggestions.
pub struct EditorAgent {
    model: Arc<dyn StructuredModel>,
}

impl EditorAgent {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self { model }
    }

    /// Review a draft. An out-of-range score is treated as a model
    /// failure.
    pub async fn review(&self, question: &str, draft: &str) -> Result<EditorFeedback, AgentError> {
        info!(question, draft_length = draft.len(), "reviewing draft");

        let feedback: EditorFeedback = call_as(
            self.model.as_ref(),
            prompts::SYSTEM_PROMPT,
            &prompts::user_prompt(question, draft),
            "editor_feedback",
            &feedback_schema(),
        )
        .await?;

        if !feedback.score_in_range() {
            return Err(AgentError::Llm(format!(
                "editor returned score {} outside 1-10",
                feedback.score
            )));
        }

        info!(
            approved = feedback.approved,
            score = feedback.score,
            issue_count = feedback.issues.len(),
            "review complete"
        );

        Ok(feedback)
    }

    /// Render feedback into the revision brief handed to the writer.
    pub fn format_feedback_for_writer(&self, feedback: &EditorFeedback) -> String {
        let mut parts = vec![format!("**Score**: {}/10", feedback.score)];

        if !feedback.issues.is_empty() {
            parts.push("\n**Issues Found:**".to_string());
            for issue in &feedback.issues {
                parts.push(format!("- {}", issue));
            }
        }

        if !feedback.suggestions.is_empty() {
            parts.push("\n**Suggestions for Improvement:**".to_string());
            for suggestion in &feedback.suggestions {
                parts.push(format!("- {}", suggestion));
            }
        }

        parts.join("\n")
    }
}

fn feedback_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "approved": {
                "type": "boolean",
                "description": "Whether the report is approved as-is"
            },
            "score": {
                "type": "integer",
                "description": "Quality score from 1-10",
                "minimum": 1,
                "maximum": 10
            },
            "issues": {
                "type": "array",
                "description": "Specific issues found in the report",
                "items": {"type": "string"}
            },
            "suggestions": {
                "type": "array",
                "description": "Suggestions for improvement",
                "items": {"type": "string"}
            }
        },
        "required": ["approved", "score", "issues", "suggestions"],
        "additionalProperties": false
    })
}
