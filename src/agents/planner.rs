//! Planner agent: turns a question into a structured research plan.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::error::AgentError;
use crate::llm::{call_as, StructuredModel};
use crate::models::ResearchPlan;
use crate::prompts::planner as prompts;

/// Creates research plans using ReAct prompting, and revises them when the
/// human reviewer rejects with feedback.
pub struct PlannerAgent {
    model: Arc<dyn StructuredModel>,
}

impl PlannerAgent {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self { model }
    }

    /// Create a research plan for the given question.
    pub async fn create_plan(&self, question: &str) -> Result<ResearchPlan, AgentError> {
        info!(question, "creating research plan");

        let plan: ResearchPlan = call_as(
            self.model.as_ref(),
            prompts::SYSTEM_PROMPT,
            &prompts::user_prompt(question),
            "research_plan",
            &plan_schema(),
        )
        .await?;

        let plan = validate_plan(plan)?;
        info!(task_count = plan.tasks.len(), "research plan created");
        Ok(plan)
    }

    /// Create a new plan from the original question plus rejection
    /// feedback.
    pub async fn replan(&self, question: &str, feedback: &str) -> Result<ResearchPlan, AgentError> {
        info!(question, "replanning from feedback");

        let plan: ResearchPlan = call_as(
            self.model.as_ref(),
            prompts::SYSTEM_PROMPT,
            &prompts::replan_prompt(question, feedback),
            "research_plan",
            &plan_schema(),
        )
        .await?;

        let plan = validate_plan(plan)?;
        info!(task_count = plan.tasks.len(), "replan complete");
        Ok(plan)
    }
}

fn validate_plan(plan: ResearchPlan) -> Result<ResearchPlan, AgentError> {
    if plan.tasks.is_empty() {
        return Err(AgentError::MissingPlan);
    }
    if !plan.has_unique_task_ids() {
        return Err(AgentError::Llm(
            "planner returned duplicate task ids".to_string(),
        ));
    }
    Ok(plan)
}

/// Output schema for both plan and replan calls.
fn plan_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "The original user question"
            },
            "strategy": {
                "type": "string",
                "description": "Overall research strategy explanation"
            },
            "tasks": {
                "type": "array",
                "description": "Research tasks in execution order",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "Unique task id, e.g. task_1"},
                        "query": {"type": "string", "description": "The search query to execute"},
                        "reasoning": {"type": "string", "description": "Why this query is needed"}
                    },
                    "required": ["id", "query", "reasoning"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["question", "strategy", "tasks"],
        "additionalProperties": false
    })
}
