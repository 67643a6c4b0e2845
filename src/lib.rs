//! # research-agent
//!
//! A reflective research agent: given a question, it plans search tasks,
//! submits the plan for human approval, researches each task with web
//! search plus arXiv/Wikipedia enrichment, then drafts a markdown report
//! that an editor agent reviews and the writer revises until it passes or
//! the iteration budget runs out.
//!
//! The library exposes the orchestration core behind swappable
//! collaborator traits ([`llm::StructuredModel`], [`tools::SearchProvider`],
//! [`tools::PaperExtractor`], [`tools::ArticleExtractor`],
//! [`hitl::DecisionSource`]) so every external interaction can be scripted
//! in tests.

pub mod agents;
pub mod config;
pub mod error;
pub mod hitl;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod tools;

pub use config::Settings;
pub use error::AgentError;
pub use orchestrator::Orchestrator;
