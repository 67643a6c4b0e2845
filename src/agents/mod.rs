//! LLM-backed agents: planner, researcher, writer, and editor.
//!
//! Each agent owns its prompts and output schema and shares the
//! [`StructuredModel`](crate::llm::StructuredModel) call primitive.

pub mod editor;
pub mod planner;
pub mod researcher;
pub mod writer;

pub use editor::EditorAgent;
pub use planner::PlannerAgent;
pub use researcher::{ResearcherAgent, ResearchSummary};
pub use writer::WriterAgent;
