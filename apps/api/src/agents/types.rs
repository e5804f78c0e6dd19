use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::errors::AgentError;

/// Free-form metadata attached to an execution result
pub type Metadata = Map<String, Value>;

/// The closed set of agent variants the gateway can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Chat,
    Search,
    Image,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Chat, AgentKind::Search, AgentKind::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Chat => "chat",
            AgentKind::Search => "search",
            AgentKind::Image => "image",
        }
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(AgentKind::Chat),
            "search" => Ok(AgentKind::Search),
            "image" => Ok(AgentKind::Image),
            other => Err(AgentError::UnknownAgentType(other.to_string())),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-call options passed to [`Agent::execute`](super::Agent::execute)
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Run external retrieval before answering (search agents)
    pub use_tools: bool,
    /// Upper bound on retrieved sources
    pub max_results: Option<usize>,
    /// Raw query for retrieval when the message itself is a directive
    pub retrieval_query: Option<String>,
    /// Caller-supplied conversation context
    pub context: Option<Map<String, Value>>,
}

impl ExecuteOptions {
    pub fn with_tools() -> Self {
        Self {
            use_tools: true,
            ..Self::default()
        }
    }
}

/// Outcome of a single agent execution
///
/// A success always carries content and never an error; a failure always
/// carries an error message.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Success { content: String, metadata: Metadata },
    Failure { error: String, metadata: Metadata },
}

impl ExecutionResult {
    pub fn success(content: impl Into<String>, metadata: Metadata) -> Self {
        ExecutionResult::Success {
            content: content.into(),
            metadata,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ExecutionResult::Failure {
            error: error.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn failure_with_metadata(error: impl Into<String>, metadata: Metadata) -> Self {
        ExecutionResult::Failure {
            error: error.into(),
            metadata,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Returns the content, or an empty string on failure
    pub fn content(&self) -> &str {
        match self {
            ExecutionResult::Success { content, .. } => content,
            ExecutionResult::Failure { .. } => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            ExecutionResult::Success { metadata, .. } | ExecutionResult::Failure { metadata, .. } => {
                metadata
            }
        }
    }

    pub fn into_metadata(self) -> Metadata {
        match self {
            ExecutionResult::Success { metadata, .. } | ExecutionResult::Failure { metadata, .. } => {
                metadata
            }
        }
    }
}

/// Result of an image generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub success: bool,
    pub image_url: Option<String>,
    pub description: String,
}

impl ImageResult {
    pub fn generated(image_url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            success: true,
            image_url: Some(image_url.into()),
            description: description.into(),
        }
    }

    /// A failed generation; the description carries the reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            description: reason.into(),
        }
    }
}
