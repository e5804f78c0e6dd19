use async_trait::async_trait;

use super::errors::AgentResult;
use super::types::{AgentKind, ExecuteOptions, ExecutionResult};

/// Contract shared by every agent variant
///
/// Implementations must be stateless between calls: a single instance is
/// cached per process and shared by concurrent requests.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The variant this instance implements
    fn kind(&self) -> AgentKind;

    /// Run the agent against a message
    ///
    /// Ordinary failures (model errors, empty search results) are reported as
    /// `Ok(ExecutionResult::Failure { .. })`. `Err` is reserved for
    /// programming and configuration faults.
    async fn execute(&self, message: &str, options: &ExecuteOptions)
        -> AgentResult<ExecutionResult>;

    /// Static description of what this agent can do
    fn capabilities(&self) -> Vec<String>;
}
