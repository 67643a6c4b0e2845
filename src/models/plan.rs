//! Research plan types and the human review verdict.

use serde::{Deserialize, Serialize};

/// A single unit of inquiry proposed by the planner.
///
/// Immutable once research begins; edits during human review replace the
/// task rather than mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchTask {
    /// Identifier unique within the owning plan (pattern `task_<n>`)
    pub id: String,
    /// The search query to execute
    pub query: String,
    /// Why this query is needed, in the planner's words
    pub reasoning: String,
}

impl ResearchTask {
    pub fn new(id: impl Into<String>, query: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// The full proposed research strategy. Task order is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchPlan {
    /// The original user question
    pub question: String,
    /// Ordered research tasks
    pub tasks: Vec<ResearchTask>,
    /// Overall strategy narrative
    pub strategy: String,
}

impl ResearchPlan {
    /// All task ids pairwise distinct.
    pub fn has_unique_task_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.tasks.iter().all(|t| seen.insert(t.id.as_str()))
    }
}

/// The action a human reviewer took on a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Approve,
    Modify,
    Reject,
}

/// One human decision on a plan, consumed immediately by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanPlanReview {
    pub action: PlanAction,
    /// Present iff `action == Modify`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_plan: Option<ResearchPlan>,
    /// Present iff `action == Reject`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl HumanPlanReview {
    pub fn approve() -> Self {
        Self {
            action: PlanAction::Approve,
            modified_plan: None,
            feedback: None,
        }
    }

    pub fn modify(plan: ResearchPlan) -> Self {
        Self {
            action: PlanAction::Modify,
            modified_plan: Some(plan),
            feedback: None,
        }
    }

    pub fn reject(feedback: impl Into<String>) -> Self {
        Self {
            action: PlanAction::Reject,
            modified_plan: None,
            feedback: Some(feedback.into()),
        }
    }
}

/// Generate a fresh `task_<n>` id that does not collide with any existing
/// task id, even after deletions left gaps in the numbering.
pub fn next_task_id(tasks: &[ResearchTask]) -> String {
    let max_suffix = tasks
        .iter()
        .filter_map(|t| t.id.strip_prefix("task_"))
        .filter_map(|s| s.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    let mut n = max_suffix + 1;
    loop {
        let candidate = format!("task_{}", n);
        if !tasks.iter().any(|t| t.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}
