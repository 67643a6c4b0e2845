//! Human review of research plans.
//!
//! The wait-for-decision step is the one interactive suspension point in
//! the workflow. It sits behind the [`DecisionSource`] trait so tests can
//! inject scripted decisions without a terminal.

use std::io::{BufRead, Stdin, Stdout, Write};

use tracing::info;

use crate::error::AgentError;
use crate::models::{next_task_id, HumanPlanReview, ResearchPlan, ResearchTask};

/// One of the four choices offered during plan review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDecision {
    Approve,
    Modify,
    Reject,
    Quit,
}

/// A source of human decisions. All methods block until the human (or the
/// script standing in for one) has answered.
pub trait DecisionSource: Send {
    /// Show the plan under review.
    fn present_plan(&mut self, plan: &ResearchPlan);

    /// Ask for one of approve/modify/reject/quit.
    fn collect_decision(&mut self) -> PlanDecision;

    /// Walk the human through editing the plan's tasks.
    fn collect_edits(&mut self, plan: &ResearchPlan) -> ResearchPlan;

    /// Ask why the plan was rejected.
    fn collect_feedback(&mut self) -> String;
}

/// Runs the review flow over any decision source.
pub struct PlanReviewer {
    source: Box<dyn DecisionSource>,
}

impl PlanReviewer {
    pub fn new(source: Box<dyn DecisionSource>) -> Self {
        Self { source }
    }

    /// Present the plan and return the human's verdict.
    ///
    /// `Quit` becomes [`AgentError::Aborted`]: a cancellation of the whole
    /// workflow, not a review outcome.
    pub fn review(&mut self, plan: &ResearchPlan) -> Result<HumanPlanReview, AgentError> {
        info!(task_count = plan.tasks.len(), "human review start");

        self.source.present_plan(plan);
        let decision = self.source.collect_decision();
        info!(?decision, "human decision");

        match decision {
            PlanDecision::Quit => Err(AgentError::Aborted),
            PlanDecision::Approve => Ok(HumanPlanReview::approve()),
            PlanDecision::Modify => {
                let edited = self.source.collect_edits(plan);
                Ok(HumanPlanReview::modify(edited))
            }
            PlanDecision::Reject => {
                let feedback = self.source.collect_feedback();
                Ok(HumanPlanReview::reject(feedback))
            }
        }
    }
}

/// Interactive decision source over a terminal (or any reader/writer pair
/// in tests).
pub struct TerminalReviewer<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl TerminalReviewer<std::io::BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: std::io::BufReader::new(std::io::stdin()),
            output: std::io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalReviewer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, text: &str) -> String {
        let _ = write!(self.output, "{}", text);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => line.trim().to_string(),
            Err(_) => String::new(),
        }
    }

    fn confirm(&mut self, text: &str) -> bool {
        let answer = self.prompt(&format!("{} [y/N] ", text)).to_lowercase();
        matches!(answer.as_str(), "y" | "yes")
    }
}

impl<R: BufRead + Send, W: Write + Send> DecisionSource for TerminalReviewer<R, W> {
    fn present_plan(&mut self, plan: &ResearchPlan) {
        let out = &mut self.output;
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "Research Plan for: {}", plan.question);
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "Strategy: {}", plan.strategy);
        let _ = writeln!(out);
        for (i, task) in plan.tasks.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, task.query);
            let _ = writeln!(out, "     {}", task.reasoning);
        }
        let _ = writeln!(out);
    }

    fn collect_decision(&mut self) -> PlanDecision {
        let out = &mut self.output;
        let _ = writeln!(out, "Options:");
        let _ = writeln!(out, "  [A]pprove - Execute the plan as-is");
        let _ = writeln!(out, "  [M]odify  - Edit the plan tasks");
        let _ = writeln!(out, "  [R]eject  - Reject and provide feedback for replanning");
        let _ = writeln!(out, "  [Q]uit    - Abort the workflow");

        loop {
            let choice = self.prompt("Your decision [a]: ").to_lowercase();
            match choice.as_str() {
                "" | "a" | "approve" => return PlanDecision::Approve,
                "m" | "modify" => return PlanDecision::Modify,
                "r" | "reject" => return PlanDecision::Reject,
                "q" | "quit" => return PlanDecision::Quit,
                other => {
                    let _ = writeln!(self.output, "Unrecognized choice: {}", other);
                }
            }
        }
    }

    fn collect_edits(&mut self, plan: &ResearchPlan) -> ResearchPlan {
        let _ = writeln!(self.output, "\nEditing plan");
        let _ = writeln!(
            self.output,
            "For each task, enter a new query, press Enter to keep it, or type 'delete' to remove it.\n"
        );

        let mut tasks: Vec<ResearchTask> = Vec::new();

        for (i, task) in plan.tasks.iter().enumerate() {
            let _ = writeln!(self.output, "Task {}:", i + 1);
            let _ = writeln!(self.output, "  Current query: {}", task.query);
            let _ = writeln!(self.output, "  Reasoning: {}", task.reasoning);

            let answer = self.prompt("  New query (Enter to keep): ");

            if matches!(answer.to_lowercase().as_str(), "delete" | "remove" | "skip") {
                if self.confirm(&format!("  Delete task {}?", i + 1)) {
                    continue;
                }
                tasks.push(task.clone());
                continue;
            }

            let query = if answer.is_empty() {
                task.query.clone()
            } else {
                answer
            };
            tasks.push(ResearchTask::new(&task.id, query, &task.reasoning));
        }

        while self.confirm("\nAdd another task?") {
            let query = self.prompt("  Query: ");
            let reasoning = self.prompt("  Reasoning: ");
            let id = next_task_id(&tasks);
            tasks.push(ResearchTask::new(id, query, reasoning));
        }

        ResearchPlan {
            question: plan.question.clone(),
            tasks,
            strategy: plan.strategy.clone(),
        }
    }

    fn collect_feedback(&mut self) -> String {
        let _ = writeln!(self.output, "\nPlan rejected.");
        let _ = writeln!(
            self.output,
            "Please provide feedback to help improve the plan:"
        );
        self.prompt("Feedback: ")
    }
}
