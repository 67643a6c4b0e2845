//! Application settings loaded from environment variables.
//!
//! Settings are constructed once at process start and passed by value into
//! the orchestrator; nothing reads the environment after startup.

use std::env;

use crate::error::AgentError;

/// Runtime configuration for a workflow run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// OpenAI API key for all LLM calls
    pub openai_api_key: String,

    /// Tavily API key for web search
    pub tavily_api_key: String,

    /// Model identifier (e.g., "gpt-4o", "gpt-4o-mini")
    pub model_name: String,

    /// Maximum results requested per search query
    pub max_search_results: u32,

    /// Maximum editor review rounds before the current draft is accepted
    pub max_reflection_iterations: u32,

    /// Editor score (1-10) at which a draft passes without explicit approval
    pub approval_threshold: u8,

    /// Maximum plan review rounds before planning fails
    pub max_plan_attempts: u32,
}

impl Settings {
    /// Load settings from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, AgentError> {
        let _ = dotenvy::dotenv();

        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let tavily_api_key = env::var("TAVILY_API_KEY")
            .map_err(|_| AgentError::Config("TAVILY_API_KEY is not set".to_string()))?;

        let settings = Self {
            openai_api_key,
            tavily_api_key,
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o".to_string()),
            max_search_results: parse_var("MAX_SEARCH_RESULTS", 10)?,
            max_reflection_iterations: parse_var("MAX_REFLECTION_ITERATIONS", 3)?,
            approval_threshold: parse_var("APPROVAL_THRESHOLD", 7)?,
            max_plan_attempts: parse_var("MAX_PLAN_ATTEMPTS", 3)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Settings with default budgets and the given API keys. Used by tests
    /// and by callers that configure programmatically.
    pub fn with_keys(openai_api_key: impl Into<String>, tavily_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            tavily_api_key: tavily_api_key.into(),
            model_name: "gpt-4o".to_string(),
            max_search_results: 10,
            max_reflection_iterations: 3,
            approval_threshold: 7,
            max_plan_attempts: 3,
        }
    }

    /// Fail fast on values that would misbehave deep inside a phase.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.model_name.is_empty() {
            return Err(AgentError::Config("MODEL_NAME cannot be empty".to_string()));
        }
        if self.max_search_results == 0 {
            return Err(AgentError::Config(
                "MAX_SEARCH_RESULTS must be at least 1".to_string(),
            ));
        }
        if self.max_reflection_iterations == 0 {
            return Err(AgentError::Config(
                "MAX_REFLECTION_ITERATIONS must be at least 1".to_string(),
            ));
        }
        if self.max_plan_attempts == 0 {
            return Err(AgentError::Config(
                "MAX_PLAN_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if !(1..=10).contains(&self.approval_threshold) {
            return Err(AgentError::Config(format!(
                "APPROVAL_THRESHOLD must be between 1 and 10, got {}",
                self.approval_threshold
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AgentError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            AgentError::Config(format!("{} must be a valid number, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
