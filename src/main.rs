//! CLI entry point for the research agent.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use research_agent::error::AgentError;
use research_agent::{Orchestrator, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "research-agent",
    version,
    about = "A reflective research agent that creates comprehensive reports",
    long_about = "\
Research Agent

Plans search tasks for your question, asks you to approve the plan, \
researches each task with Tavily web search plus arXiv and Wikipedia \
enrichment, then writes a markdown report that an editor agent reviews \
until it meets the quality bar.

PREREQUISITES:
  OPENAI_API_KEY and TAVILY_API_KEY must be set (a .env file works).

EXAMPLES:
  research-agent \"What are the latest developments in Rust async?\"
  research-agent --output report.md \"History of the transformer architecture\""
)]
struct Args {
    /// The research question to investigate (prompted interactively when
    /// omitted)
    #[arg(value_name = "QUESTION")]
    question: Option<String>,

    /// Save the final report's markdown to this path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Model to use (overrides MODEL_NAME env var)
    #[arg(short, long, env = "MODEL_NAME")]
    model: Option<String>,

    /// Enable verbose/debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(1);
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "research failed");
            eprintln!("\nError: {}", e);
            eprintln!("Use --verbose or RUST_LOG=debug for more details.");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut settings = Settings::from_env()?;
    if let Some(model) = args.model {
        settings.model_name = model;
    }
    settings.validate()?;

    info!(model = %settings.model_name, "configuration loaded");

    let question = match args.question {
        Some(question) => question,
        None => prompt_question()?,
    };

    let question = question.trim().to_string();
    if question.is_empty() || matches!(question.to_lowercase().as_str(), "quit" | "exit" | "q") {
        println!("Goodbye!");
        return Ok(ExitCode::SUCCESS);
    }

    let mut orchestrator = Orchestrator::new(settings);

    let report = match orchestrator.run(&question).await {
        Ok(report) => report,
        Err(e @ AgentError::Aborted) => {
            println!("\n{}", e);
            // Cancellation, reported distinctly from errors
            return Ok(ExitCode::from(130));
        }
        Err(e) => return Err(e.into()),
    };

    print_report(&report.title, &report.content, report.iterations, report.sources.len());

    let save_path = match args.output {
        Some(path) => Some(path),
        None => prompt_save_path()?,
    };

    if let Some(path) = save_path {
        let written = report.save_markdown(&path)?;
        println!("Report saved to {}", written.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn prompt_question() -> Result<String> {
    print!("Enter your research question: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn prompt_save_path() -> Result<Option<PathBuf>> {
    print!("\nSave report to file? (enter a path, or press Enter to skip): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim();

    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}

fn print_report(title: &str, content: &str, iterations: u32, source_count: usize) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}\n", "=".repeat(60));
    println!("{}", content);
    println!("\n{}", "=".repeat(60));
    println!(
        "Report completed in {} iteration(s) with {} sources.",
        iterations, source_count
    );
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set logging subscriber: {}", e))?;

    Ok(())
}
