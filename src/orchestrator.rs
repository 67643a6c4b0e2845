//! Workflow orchestrator.
//!
//! Sequences the phases with hard barriers between them:
//!
//! 1. Planning, with the human approval sub-machine and its bounded
//!    replanning loop
//! 2. Research, one task at a time in plan order
//! 3. Writing the initial draft
//! 4. The reflection loop: editor review against writer revision, bounded
//!    by the iteration budget
//!
//! A `quit` decision or a fatal error from any phase aborts the whole run;
//! partial findings are discarded, not checkpointed.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::agents::{EditorAgent, PlannerAgent, ResearcherAgent, WriterAgent};
use crate::config::Settings;
use crate::error::AgentError;
use crate::hitl::{DecisionSource, PlanReviewer, TerminalReviewer};
use crate::llm::{OpenAiModel, StructuredModel};
use crate::models::{
    FinalReport, PlanAction, ResearchFindings, ResearchPlan, WorkflowStage, WorkflowState,
};
use crate::tools::{
    ArticleExtractor, ArxivClient, PaperExtractor, SearchProvider, TavilyClient, WikipediaClient,
};

/// Coordinates the full research workflow.
pub struct Orchestrator {
    settings: Settings,
    planner: PlannerAgent,
    researcher: ResearcherAgent,
    writer: WriterAgent,
    editor: EditorAgent,
    reviewer: PlanReviewer,
    state: WorkflowState,
}

impl Orchestrator {
    /// Build an orchestrator against the real collaborators: OpenAI for
    /// the model, Tavily for search, arXiv and Wikipedia for enrichment,
    /// and the terminal for plan review.
    pub fn new(settings: Settings) -> Self {
        let model: Arc<dyn StructuredModel> = Arc::new(OpenAiModel::new(
            settings.openai_api_key.clone(),
            settings.model_name.clone(),
        ));
        let search: Arc<dyn SearchProvider> =
            Arc::new(TavilyClient::new(settings.tavily_api_key.clone()));
        let papers: Arc<dyn PaperExtractor> = Arc::new(ArxivClient::new());
        let articles: Arc<dyn ArticleExtractor> = Arc::new(WikipediaClient::new());
        let decisions: Box<dyn DecisionSource> = Box::new(TerminalReviewer::stdio());

        Self::with_collaborators(settings, model, search, papers, articles, decisions)
    }

    /// Build an orchestrator with injected collaborators. This is the
    /// seam tests use to script every external interaction.
    pub fn with_collaborators(
        settings: Settings,
        model: Arc<dyn StructuredModel>,
        search: Arc<dyn SearchProvider>,
        papers: Arc<dyn PaperExtractor>,
        articles: Arc<dyn ArticleExtractor>,
        decisions: Box<dyn DecisionSource>,
    ) -> Self {
        let planner = PlannerAgent::new(model.clone());
        let researcher = ResearcherAgent::new(
            model.clone(),
            search,
            papers,
            articles,
            settings.max_search_results,
        );
        let writer = WriterAgent::new(model.clone());
        let editor = EditorAgent::new(model);

        Self {
            settings,
            planner,
            researcher,
            writer,
            editor,
            reviewer: PlanReviewer::new(decisions),
            state: WorkflowState::new(""),
        }
    }

    /// The state snapshot of the current or most recent run.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Run the complete workflow for a question.
    pub async fn run(&mut self, question: &str) -> Result<FinalReport, AgentError> {
        info!(question, "workflow start");
        println!("\nResearch question: {}\n", question);

        self.state = WorkflowState::new(question);

        let result = self.run_phases(question).await;

        match &result {
            Ok(report) => {
                self.state.final_report = Some(report.clone());
                self.state.enter(WorkflowStage::Completed);
                info!(title = %report.title, iterations = report.iterations, "workflow complete");
            }
            Err(e) => {
                let failed_stage = self.state.stage;
                self.state.fail(e.to_string());
                if e.is_abort() {
                    warn!("workflow aborted by user");
                } else {
                    error!(stage = ?failed_stage, error = %e, "workflow failed");
                    eprintln!("\nWorkflow failed during {:?}: {}", failed_stage, e);
                }
            }
        }

        result
    }

    async fn run_phases(&mut self, question: &str) -> Result<FinalReport, AgentError> {
        let plan = self.planning_phase(question).await?;
        let findings = self.research_phase(&plan).await?;
        self.writing_phase(question, &findings).await
    }

    /// Phase 1: planning with human review. Each rejection consumes one
    /// attempt from the budget; the rejection that exhausts it is
    /// terminal.
    async fn planning_phase(&mut self, question: &str) -> Result<ResearchPlan, AgentError> {
        println!("Phase 1: Planning");
        self.state.enter(WorkflowStage::Planning);

        let mut plan = self.planner.create_plan(question).await?;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            self.state.plan_attempts = attempts;
            self.state.plan = Some(plan.clone());
            self.state.enter(WorkflowStage::HumanReview);

            let review = self.reviewer.review(&plan)?;
            self.state.human_review = Some(review.clone());

            match review.action {
                PlanAction::Approve => {
                    println!("Plan approved");
                    return Ok(plan);
                }
                PlanAction::Modify => {
                    // The edited plan is the approved plan; no second
                    // review round
                    let modified = review.modified_plan.unwrap_or(plan);
                    println!("Using modified plan");
                    self.state.plan = Some(modified.clone());
                    return Ok(modified);
                }
                PlanAction::Reject => {
                    if attempts >= self.settings.max_plan_attempts {
                        println!(
                            "Maximum plan attempts ({}) reached",
                            self.settings.max_plan_attempts
                        );
                        return Err(AgentError::PlanningExhausted { attempts });
                    }

                    let feedback = review.feedback.unwrap_or_default();
                    println!("Replanning based on feedback...");
                    self.state.enter(WorkflowStage::Planning);
                    plan = self.planner.replan(question, &feedback).await?;
                }
            }
        }
    }

    /// Phase 2: execute the approved plan's tasks sequentially, in plan
    /// order.
    async fn research_phase(
        &mut self,
        plan: &ResearchPlan,
    ) -> Result<Vec<ResearchFindings>, AgentError> {
        println!("\nPhase 2: Research");
        self.state.enter(WorkflowStage::Researching);

        let mut findings = Vec::with_capacity(plan.tasks.len());

        for (i, task) in plan.tasks.iter().enumerate() {
            println!(
                "  [{}/{}] Researching: {}",
                i + 1,
                plan.tasks.len(),
                task.query
            );
            self.state.current_task_index = i;

            let finding = self.researcher.execute_task(task).await?;
            println!(
                "    {} sources, {} papers, {} wiki articles",
                finding.sources.len(),
                finding.papers.len(),
                finding.articles.len()
            );

            self.state.findings.push(finding.clone());
            findings.push(finding);
        }

        println!("Research complete: {} tasks executed", findings.len());
        Ok(findings)
    }

    /// Phase 3: initial draft, then the reflection loop.
    ///
    /// Termination conditions, in order: editor approval, score at or
    /// above the threshold, iteration budget reached (the current draft is
    /// returned as-is).
    async fn writing_phase(
        &mut self,
        question: &str,
        findings: &[ResearchFindings],
    ) -> Result<FinalReport, AgentError> {
        println!("\nPhase 3: Writing & Editing");
        self.state.enter(WorkflowStage::Writing);

        let mut report = self.writer.write_report(question, findings).await?;
        println!("  Draft complete: {} characters", report.content.len());
        self.state.current_draft = Some(report.content.clone());

        self.state.enter(WorkflowStage::Editing);

        let mut iteration = 0u32;
        while iteration < self.settings.max_reflection_iterations {
            iteration += 1;

            let feedback = self.editor.review(question, &report.content).await?;
            println!(
                "  Editor iteration {}: score {}/10, {} issues, approved: {}",
                iteration,
                feedback.score,
                feedback.issues.len(),
                feedback.approved
            );
            self.state.editor_feedback.push(feedback.clone());

            if feedback.approved {
                println!("Report approved by editor");
                return Ok(report);
            }

            if feedback.score >= self.settings.approval_threshold {
                println!(
                    "Report meets quality threshold (score {} >= {})",
                    feedback.score, self.settings.approval_threshold
                );
                return Ok(report);
            }

            if iteration >= self.settings.max_reflection_iterations {
                println!(
                    "Maximum reflection iterations ({}) reached, using current draft",
                    self.settings.max_reflection_iterations
                );
                return Ok(report);
            }

            let brief = self.editor.format_feedback_for_writer(&feedback);
            report = self.writer.revise_report(question, &report, &brief).await?;
            self.state.current_draft = Some(report.content.clone());
            self.state.revision_count += 1;
        }

        Ok(report)
    }
}
