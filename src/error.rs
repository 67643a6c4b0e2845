//! Error types for the research workflow.
//!
//! Two layers: adapter-level errors (`SearchError`) carry the HTTP detail
//! of a single collaborator, and `AgentError` is what phases of the
//! workflow surface to the orchestrator and CLI.

use thiserror::Error;

/// Typed errors from the search provider adapter.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized - check API key")]
    Unauthorized,

    #[error("rate limited - too many requests")]
    RateLimited,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("failed to parse response: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Retry is only worthwhile for transient failures.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::Timeout
                | SearchError::Connection(_)
                | SearchError::RateLimited
                | SearchError::ServerError(_, _)
        )
    }
}

/// Top-level workflow error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Search provider failure. Fatal for the task that issued the query.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// LLM call failure (transport, HTTP status, or malformed output).
    #[error("LLM call failed: {0}")]
    Llm(String),

    /// The plan was rejected as many times as the budget allows.
    #[error("maximum plan attempts ({attempts}) exceeded")]
    PlanningExhausted { attempts: u32 },

    /// The planner returned a plan with no tasks to execute.
    #[error("planner produced a plan with no tasks")]
    MissingPlan,

    /// The user chose to quit during plan review. A cancellation signal,
    /// not a failure.
    #[error("workflow aborted by user")]
    Aborted,

    #[error("configuration error: {0}")]
    Config(String),
}

impl AgentError {
    /// Whether this error represents a deliberate user cancellation.
    pub fn is_abort(&self) -> bool {
        matches!(self, AgentError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_retryable() {
        assert!(SearchError::Timeout.is_retryable());
        assert!(SearchError::RateLimited.is_retryable());
        assert!(SearchError::ServerError(500, String::new()).is_retryable());
        assert!(SearchError::Connection("refused".to_string()).is_retryable());

        assert!(!SearchError::Unauthorized.is_retryable());
        assert!(!SearchError::BadRequest("invalid".to_string()).is_retryable());
        assert!(!SearchError::ParseError("bad json".to_string()).is_retryable());
    }

    #[test]
    fn test_search_error_into_agent_error() {
        let err: AgentError = SearchError::Unauthorized.into();
        assert!(matches!(err, AgentError::Search(_)));
        assert!(err.to_string().contains("check API key"));
    }

    #[test]
    fn test_planning_exhausted_display() {
        let err = AgentError::PlanningExhausted { attempts: 3 };
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_abort_is_not_an_error_exit() {
        assert!(AgentError::Aborted.is_abort());
        assert!(!AgentError::MissingPlan.is_abort());
    }
}
