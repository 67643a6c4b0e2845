//! Human-in-the-loop plan review.

pub mod plan_review;

pub use plan_review::{DecisionSource, PlanDecision, PlanReviewer, TerminalReviewer};
