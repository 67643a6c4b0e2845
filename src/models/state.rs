//! Workflow state snapshot.
//!
//! The orchestrator keeps this snapshot current as it advances through the
//! phases. Nothing in the current control flow reads it back; it exists as
//! a serialization target for future checkpoint/resume support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::{HumanPlanReview, ResearchPlan};
use super::report::{EditorFeedback, FinalReport};
use super::research::ResearchFindings;

/// The phase a workflow run is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Planning,
    HumanReview,
    Researching,
    Writing,
    Editing,
    Completed,
    Failed,
}

/// Complete workflow state for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub workflow_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub stage: WorkflowStage,

    /// Original user question
    pub question: String,

    // Planning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ResearchPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_review: Option<HumanPlanReview>,
    pub plan_attempts: u32,

    // Research
    pub current_task_index: usize,
    pub findings: Vec<ResearchFindings>,

    // Writing / editing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_draft: Option<String>,
    pub editor_feedback: Vec<EditorFeedback>,
    pub revision_count: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_report: Option<FinalReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl WorkflowState {
    /// Fresh snapshot for a new run.
    pub fn new(question: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            workflow_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            stage: WorkflowStage::Planning,
            question: question.into(),
            plan: None,
            human_review: None,
            plan_attempts: 0,
            current_task_index: 0,
            findings: Vec::new(),
            current_draft: None,
            editor_feedback: Vec::new(),
            revision_count: 0,
            final_report: None,
            error_message: None,
        }
    }

    /// Advance to `stage`, refreshing the update timestamp.
    pub fn enter(&mut self, stage: WorkflowStage) {
        self.stage = stage;
        self.updated_at = Utc::now();
    }

    /// Mark the run failed with a message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.enter(WorkflowStage::Failed);
    }
}
