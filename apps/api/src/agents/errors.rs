use thiserror::Error;

/// Errors that can occur in the agent system
///
/// Ordinary agent failures (model errors, empty search results) are not
/// errors: they are reported through [`ExecutionResult::Failure`]. These
/// variants cover lookups, configuration and faults.
///
/// [`ExecutionResult::Failure`]: super::types::ExecutionResult::Failure
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Unknown agent type '{0}'")]
    UnknownAgentType(String),

    #[error("LLM API error: {0}")]
    LlmError(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Agent execution panicked: {0}")]
    ExecutionPanicked(String),
}

impl AgentError {
    /// Whether the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, AgentError::UnknownAgentType(_))
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
