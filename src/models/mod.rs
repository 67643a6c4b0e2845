//! Domain model types shared across agents and the orchestrator.

pub mod plan;
pub mod report;
pub mod research;
pub mod state;

pub use plan::{next_task_id, HumanPlanReview, PlanAction, ResearchPlan, ResearchTask};
pub use report::{EditorFeedback, FinalReport};
pub use research::{
    ArxivPaper, ClassifiedLinks, EnrichedSource, ResearchFindings, SearchHit, SourceKind,
    WikiArticle,
};
pub use state::{WorkflowStage, WorkflowState};
