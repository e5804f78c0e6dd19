use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::agent::Agent;
use super::chat::ChatAgent;
use super::errors::AgentResult;
use super::image::ImageAgent;
use super::llm::{LlmClient, OpenAiClient};
use super::retrieval::{Retriever, SearxRetriever};
use super::search::SearchAgent;
use super::types::AgentKind;
use crate::config::AgentConfig;

/// Builds agent instances for the cache
pub trait AgentFactory: Send + Sync {
    fn build(&self, kind: AgentKind) -> AgentResult<Arc<dyn Agent>>;
}

/// Factory wiring every agent to the configured LLM backend and retriever
pub struct ConfiguredAgentFactory {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    retriever: Option<Arc<dyn Retriever>>,
}

impl ConfiguredAgentFactory {
    /// Creates the factory with the OpenAI-compatible client and, when a
    /// search endpoint is configured, a SearXNG retriever
    pub fn new(config: AgentConfig) -> AgentResult<Self> {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(&config)?);
        let retriever = match &config.search_api_url {
            Some(url) => {
                Some(Arc::new(SearxRetriever::new(url.clone(), config.timeout_secs)?)
                    as Arc<dyn Retriever>)
            }
            None => None,
        };

        Ok(Self::with_backends(config, llm, retriever))
    }

    pub fn with_backends(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        retriever: Option<Arc<dyn Retriever>>,
    ) -> Self {
        Self {
            config,
            llm,
            retriever,
        }
    }
}

impl AgentFactory for ConfiguredAgentFactory {
    fn build(&self, kind: AgentKind) -> AgentResult<Arc<dyn Agent>> {
        let agent: Arc<dyn Agent> = match kind {
            AgentKind::Chat => Arc::new(ChatAgent::new(
                self.llm.clone(),
                self.config.temperature,
                self.config.max_tokens,
            )),
            AgentKind::Search => Arc::new(SearchAgent::new(
                self.llm.clone(),
                self.retriever.clone(),
                self.config.temperature,
                self.config.max_tokens,
            )),
            AgentKind::Image => Arc::new(ImageAgent::new(self.llm.clone())),
        };
        Ok(agent)
    }
}

/// Process-scoped cache holding one agent instance per kind
///
/// Instances are built lazily on first request. The write lock is taken only
/// to insert on a miss, and the entry is re-checked under it so concurrent
/// first requests for the same kind build a single instance.
pub struct AgentCache {
    factory: Arc<dyn AgentFactory>,
    agents: RwLock<HashMap<AgentKind, Arc<dyn Agent>>>,
    constructions: AtomicUsize,
}

impl AgentCache {
    pub fn new(factory: Arc<dyn AgentFactory>) -> Self {
        Self {
            factory,
            agents: RwLock::new(HashMap::new()),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Resolve an agent by its type tag, creating it on first use
    ///
    /// # Errors
    /// * `AgentError::UnknownAgentType` - the tag names no known variant;
    ///   nothing is constructed
    /// * any error returned by the factory
    pub async fn get_or_create(&self, agent_type: &str) -> AgentResult<Arc<dyn Agent>> {
        let kind: AgentKind = agent_type.parse()?;
        self.get_or_create_kind(kind).await
    }

    pub async fn get_or_create_kind(&self, kind: AgentKind) -> AgentResult<Arc<dyn Agent>> {
        {
            let agents = self.agents.read().await;
            if let Some(agent) = agents.get(&kind) {
                tracing::debug!(agent = %kind, "Agent cache hit");
                return Ok(agent.clone());
            }
        }

        let mut agents = self.agents.write().await;
        if let Some(agent) = agents.get(&kind) {
            return Ok(agent.clone());
        }

        let agent = self.factory.build(kind)?;
        self.constructions.fetch_add(1, Ordering::Relaxed);
        agents.insert(kind, agent.clone());
        tracing::info!(agent = %kind, "Created agent instance");

        Ok(agent)
    }

    /// Number of cached instances
    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }

    /// Total instances built since the cache was created
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }

    /// Drop every cached instance
    pub async fn clear(&self) {
        let mut agents = self.agents.write().await;
        let released = agents.len();
        agents.clear();
        tracing::info!(released, "Agent cache cleared");
    }
}
