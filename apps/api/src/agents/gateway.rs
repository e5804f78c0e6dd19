use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::agent::Agent;
use super::cache::AgentCache;
use super::errors::{AgentError, AgentResult};
use super::prompts::{library, PromptTemplate};
use super::types::{AgentKind, ExecuteOptions, ExecutionResult, Metadata};

fn default_agent_type() -> String {
    AgentKind::Chat.as_str().to_string()
}

fn default_max_results() -> usize {
    5
}

/// Inbound chat dispatch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_agent_type")]
    pub agent_type: String,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub agent_type: String,
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub error: Option<String>,
}

/// Inbound search dispatch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub summary: String,
    /// Agent metadata; `results_count` holds the number of retrieved sources
    pub search_results: Option<Metadata>,
    /// Number of retrieval tool runs (0 or 1), not the number of sources
    pub sources_count: u64,
    pub error: Option<String>,
}

impl SearchResponse {
    fn failed(query: String, error: String) -> Self {
        Self {
            success: false,
            query,
            summary: String::new(),
            search_results: None,
            sources_count: 0,
            error: Some(error),
        }
    }
}

/// Capability lists of the agents exposed for introspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesSnapshot {
    pub search_agent: Vec<String>,
    pub chat_agent: Vec<String>,
}

/// Request-routing layer in front of the agent cache
///
/// Converts whatever an agent does (succeed, fail, return an error, panic)
/// into the uniform response shapes above. Only an unknown agent type escapes
/// as an error, because it is the caller's fault.
pub struct AgentGateway {
    cache: Arc<AgentCache>,
    search_directive: PromptTemplate,
}

impl AgentGateway {
    pub fn new(cache: Arc<AgentCache>) -> Self {
        Self {
            cache,
            search_directive: library::search_directive(),
        }
    }

    pub fn cache(&self) -> &Arc<AgentCache> {
        &self.cache
    }

    /// Route a chat request to the requested agent
    ///
    /// # Errors
    /// Returns `AgentError::UnknownAgentType` when `agent_type` names no
    /// known variant. Every other problem is reported inside the response.
    pub async fn dispatch_chat(&self, request: ChatRequest) -> AgentResult<ChatResponse> {
        let agent = match self.cache.get_or_create(&request.agent_type).await {
            Ok(agent) => agent,
            Err(e) if e.is_client_error() => return Err(e),
            Err(e) => {
                tracing::error!(error = %e, agent = %request.agent_type, "Failed to resolve agent");
                return Ok(ChatResponse {
                    success: false,
                    response: String::new(),
                    agent_type: request.agent_type,
                    capabilities: Vec::new(),
                    metadata: Metadata::new(),
                    error: Some(e.to_string()),
                });
            }
        };

        let capabilities = agent.capabilities();
        let options = ExecuteOptions {
            context: request.context,
            ..ExecuteOptions::default()
        };

        match execute_guarded(agent.as_ref(), &request.message, &options).await {
            Ok(result) => {
                if let Some(error) = result.error() {
                    tracing::warn!(agent = %request.agent_type, error, "Agent reported failure");
                }
                let success = result.is_success();
                let response = result.content().to_string();
                let error = result.error().map(str::to_string);

                Ok(ChatResponse {
                    success,
                    response,
                    agent_type: request.agent_type,
                    capabilities,
                    metadata: result.into_metadata(),
                    error,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, agent = %request.agent_type, "Agent execution fault");
                Ok(ChatResponse {
                    success: false,
                    response: String::new(),
                    agent_type: request.agent_type,
                    capabilities,
                    metadata: Metadata::new(),
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Ask the search agent to search and summarise
    ///
    /// Never fails: faults are folded into `success == false`.
    pub async fn dispatch_search(&self, request: SearchRequest) -> SearchResponse {
        let directive = self
            .search_directive
            .render_with(&[("query", &request.query)]);
        let options = ExecuteOptions {
            use_tools: true,
            max_results: Some(request.max_results),
            retrieval_query: Some(request.query.clone()),
            context: None,
        };

        let outcome = match self.cache.get_or_create_kind(AgentKind::Search).await {
            Ok(agent) => execute_guarded(agent.as_ref(), &directive, &options).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(ExecutionResult::Success { content, metadata }) => SearchResponse {
                success: true,
                query: request.query,
                summary: content,
                sources_count: sources_count(&metadata),
                search_results: Some(metadata),
                error: None,
            },
            Ok(ExecutionResult::Failure { error, .. }) => {
                tracing::warn!(query = %request.query, error = %error, "Search failed");
                SearchResponse::failed(request.query, error)
            }
            Err(e) => {
                tracing::error!(error = %e, query = %request.query, "Search execution fault");
                SearchResponse::failed(request.query, e.to_string())
            }
        }
    }

    /// Capability lists of the search and chat agents, creating them if needed
    pub async fn capabilities_snapshot(&self) -> AgentResult<CapabilitiesSnapshot> {
        let search = self.cache.get_or_create_kind(AgentKind::Search).await?;
        let chat = self.cache.get_or_create_kind(AgentKind::Chat).await?;

        Ok(CapabilitiesSnapshot {
            search_agent: search.capabilities(),
            chat_agent: chat.capabilities(),
        })
    }
}

/// Run an agent, turning a panic into `AgentError::ExecutionPanicked`
async fn execute_guarded(
    agent: &dyn Agent,
    message: &str,
    options: &ExecuteOptions,
) -> AgentResult<ExecutionResult> {
    match AssertUnwindSafe(agent.execute(message, options))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => Err(AgentError::ExecutionPanicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Number of sources consulted, read from execution metadata
///
/// `tool_run_count` wins when present, then `tools_used`, else 0. Values are
/// coerced leniently: negative numbers become 0, floats are truncated,
/// numeric strings are parsed and arrays count their elements.
pub fn sources_count(metadata: &Metadata) -> u64 {
    metadata
        .get("tool_run_count")
        .or_else(|| metadata.get("tools_used"))
        .map(coerce_count)
        .unwrap_or(0)
}

fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(truncate_non_negative))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_non_negative))
                .unwrap_or(0)
        }
        Value::Array(items) => items.len() as u64,
        _ => 0,
    }
}

fn truncate_non_negative(f: f64) -> Option<u64> {
    if f.is_finite() && f > 0.0 {
        Some(f.trunc() as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::cache::AgentFactory;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Reply(&'static str, Metadata),
        Fail(&'static str),
        Fault,
        Panic,
    }

    struct StubAgent {
        kind: AgentKind,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn kind(&self) -> AgentKind {
            self.kind
        }

        async fn execute(
            &self,
            _message: &str,
            _options: &ExecuteOptions,
        ) -> AgentResult<ExecutionResult> {
            match &self.behaviour {
                Behaviour::Reply(content, metadata) => {
                    Ok(ExecutionResult::success(*content, metadata.clone()))
                }
                Behaviour::Fail(error) => Ok(ExecutionResult::failure(*error)),
                Behaviour::Fault => Err(AgentError::LlmError("socket closed".to_string())),
                Behaviour::Panic => panic!("agent blew up"),
            }
        }

        fn capabilities(&self) -> Vec<String> {
            vec![format!("{}_capability", self.kind)]
        }
    }

    struct StubFactory {
        builds: AtomicUsize,
        make: Box<dyn Fn(AgentKind) -> Behaviour + Send + Sync>,
    }

    impl AgentFactory for StubFactory {
        fn build(&self, kind: AgentKind) -> AgentResult<Arc<dyn Agent>> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubAgent {
                kind,
                behaviour: (self.make)(kind),
            }))
        }
    }

    fn gateway(
        make: impl Fn(AgentKind) -> Behaviour + Send + Sync + 'static,
    ) -> (AgentGateway, Arc<StubFactory>) {
        let factory = Arc::new(StubFactory {
            builds: AtomicUsize::new(0),
            make: Box::new(make),
        });
        let cache = Arc::new(AgentCache::new(factory.clone()));
        (AgentGateway::new(cache), factory)
    }

    fn chat(message: &str, agent_type: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            agent_type: agent_type.to_string(),
            context: None,
        }
    }

    fn metadata(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn chat_success_maps_into_response() {
        let (gateway, _) = gateway(|_| Behaviour::Reply("hi", Metadata::new()));

        let response = gateway.dispatch_chat(chat("hello", "chat")).await.unwrap();

        assert_eq!(
            response,
            ChatResponse {
                success: true,
                response: "hi".to_string(),
                agent_type: "chat".to_string(),
                capabilities: vec!["chat_capability".to_string()],
                metadata: Metadata::new(),
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn unknown_agent_type_is_rejected_without_construction() {
        let (gateway, factory) = gateway(|_| Behaviour::Reply("hi", Metadata::new()));

        for agent_type in ["weather", "", "CHAT", "chat "] {
            let err = gateway.dispatch_chat(chat("hello", agent_type)).await.unwrap_err();
            assert!(matches!(err, AgentError::UnknownAgentType(ref t) if t == agent_type));
        }

        assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn agent_failure_keeps_capabilities() {
        let (gateway, _) = gateway(|_| Behaviour::Fail("model offline"));

        let response = gateway.dispatch_chat(chat("hello", "chat")).await.unwrap();

        assert!(!response.success);
        assert_eq!(response.response, "");
        assert_eq!(response.error.as_deref(), Some("model offline"));
        assert_eq!(response.capabilities, vec!["chat_capability".to_string()]);
    }

    #[tokio::test]
    async fn execution_fault_is_folded_into_response() {
        let (gateway, _) = gateway(|_| Behaviour::Fault);

        let response = gateway.dispatch_chat(chat("hello", "search")).await.unwrap();

        assert!(!response.success);
        assert!(response.error.unwrap().contains("socket closed"));
        assert_eq!(response.capabilities, vec!["search_capability".to_string()]);
    }

    #[tokio::test]
    async fn execution_panic_is_folded_into_response() {
        let (gateway, _) = gateway(|_| Behaviour::Panic);

        let response = gateway.dispatch_chat(chat("hello", "image")).await.unwrap();

        assert!(!response.success);
        assert!(response.error.unwrap().contains("agent blew up"));
        assert_eq!(response.capabilities, vec!["image_capability".to_string()]);
    }

    #[tokio::test]
    async fn repeated_dispatch_reuses_cached_agent() {
        let (gateway, factory) = gateway(|_| Behaviour::Reply("hi", Metadata::new()));

        gateway.dispatch_chat(chat("one", "chat")).await.unwrap();
        gateway.dispatch_chat(chat("two", "chat")).await.unwrap();

        assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_success_reports_sources() {
        let (gateway, _) = gateway(|_| {
            Behaviour::Reply("summary", metadata(json!({"tool_run_count": 3, "tools_used": 9})))
        });

        let response = gateway
            .dispatch_search(SearchRequest {
                query: "lenses".to_string(),
                max_results: 5,
            })
            .await;

        assert!(response.success);
        assert_eq!(response.query, "lenses");
        assert_eq!(response.summary, "summary");
        assert_eq!(response.sources_count, 3);
        assert_eq!(response.search_results.unwrap()["tools_used"], 9);
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn search_failure_omits_results() {
        let (gateway, _) = gateway(|_| Behaviour::Fail("no results"));

        let response = gateway
            .dispatch_search(SearchRequest {
                query: "lenses".to_string(),
                max_results: 5,
            })
            .await;

        assert!(!response.success);
        assert_eq!(response.summary, "");
        assert!(response.search_results.is_none());
        assert_eq!(response.sources_count, 0);
        assert_eq!(response.error.as_deref(), Some("no results"));
    }

    #[tokio::test]
    async fn search_fault_is_folded_into_response() {
        let (gateway, _) = gateway(|_| Behaviour::Panic);

        let response = gateway
            .dispatch_search(SearchRequest {
                query: "lenses".to_string(),
                max_results: 5,
            })
            .await;

        assert!(!response.success);
        assert_eq!(response.sources_count, 0);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn capabilities_snapshot_creates_search_and_chat() {
        let (gateway, factory) = gateway(|_| Behaviour::Reply("hi", Metadata::new()));

        let snapshot = gateway.capabilities_snapshot().await.unwrap();

        assert_eq!(snapshot.search_agent, vec!["search_capability".to_string()]);
        assert_eq!(snapshot.chat_agent, vec!["chat_capability".to_string()]);
        assert_eq!(factory.builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn sources_count_prefers_tool_run_count() {
        assert_eq!(sources_count(&metadata(json!({"tool_run_count": 3, "tools_used": 9}))), 3);
        assert_eq!(sources_count(&metadata(json!({"tools_used": 9}))), 9);
        assert_eq!(sources_count(&Metadata::new()), 0);
    }

    #[test]
    fn sources_count_coerces_leniently() {
        assert_eq!(sources_count(&metadata(json!({"tool_run_count": -2}))), 0);
        assert_eq!(sources_count(&metadata(json!({"tool_run_count": 2.9}))), 2);
        assert_eq!(sources_count(&metadata(json!({"tool_run_count": "4"}))), 4);
        assert_eq!(sources_count(&metadata(json!({"tool_run_count": "many"}))), 0);
        assert_eq!(sources_count(&metadata(json!({"tools_used": ["web", "maps"]}))), 2);
        assert_eq!(sources_count(&metadata(json!({"tool_run_count": null, "tools_used": 9}))), 0);
    }
}
