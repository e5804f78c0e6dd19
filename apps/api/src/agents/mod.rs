// Agent system modules
//
// Pluggable chat, search and image agents behind one trait, a process-wide
// cache that builds each variant once, and the gateway that turns agent
// results into the public response shapes.

pub mod agent;
pub mod cache;
pub mod chat;
pub mod errors;
pub mod gateway;
pub mod image;
pub mod llm;
pub mod prompts;
pub mod retrieval;
pub mod search;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use agent::Agent;
pub use cache::{AgentCache, AgentFactory, ConfiguredAgentFactory};
pub use errors::{AgentError, AgentResult};
pub use gateway::{
    AgentGateway, CapabilitiesSnapshot, ChatRequest, ChatResponse, SearchRequest, SearchResponse,
};
pub use image::ImageAgent;
pub use types::{AgentKind, ExecuteOptions, ExecutionResult, ImageResult, Metadata};
