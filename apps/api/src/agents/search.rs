use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::agent::Agent;
use super::chat::completion_metadata;
use super::errors::AgentResult;
use super::llm::{ChatMessage, CompletionRequest, LlmClient};
use super::prompts::{library, PromptTemplate};
use super::retrieval::{Retriever, SearchHit};
use super::types::{AgentKind, ExecuteOptions, ExecutionResult, Metadata};

const DEFAULT_MAX_RESULTS: usize = 5;

/// Agent that retrieves sources and summarises them
///
/// Without a retriever, or when `use_tools` is off, it answers from the
/// model alone and reports zero tool runs.
pub struct SearchAgent {
    llm: Arc<dyn LlmClient>,
    retriever: Option<Arc<dyn Retriever>>,
    prompt: PromptTemplate,
    temperature: f32,
    max_tokens: u32,
}

impl SearchAgent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Option<Arc<dyn Retriever>>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            llm,
            retriever,
            prompt: library::search_summary(),
            temperature,
            max_tokens,
        }
    }

    async fn summarise(
        &self,
        message: &str,
        hits: &[SearchHit],
        mut metadata: Metadata,
    ) -> ExecutionResult {
        let sources = if hits.is_empty() {
            "(no sources retrieved)".to_string()
        } else {
            format_sources(hits)
        };

        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(&self.prompt.system),
                ChatMessage::user(
                    self.prompt
                        .render_with(&[("message", message), ("sources", &sources)]),
                ),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.llm.complete(request).await {
            Ok(completion) if completion.content.trim().is_empty() => {
                ExecutionResult::failure_with_metadata("Model returned an empty summary", metadata)
            }
            Ok(completion) => {
                metadata.extend(completion_metadata(&completion, &self.prompt));
                ExecutionResult::success(completion.content, metadata)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Search summarisation failed");
                ExecutionResult::failure_with_metadata(e.to_string(), metadata)
            }
        }
    }
}

fn format_sources(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("[{}] {} ({})\n{}", i + 1, hit.title, hit.url, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Agent for SearchAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Search
    }

    async fn execute(
        &self,
        message: &str,
        options: &ExecuteOptions,
    ) -> AgentResult<ExecutionResult> {
        let mut metadata = Metadata::new();

        let retriever = match (&self.retriever, options.use_tools) {
            (Some(retriever), true) => retriever,
            _ => {
                metadata.insert("tool_run_count".to_string(), json!(0));
                return Ok(self.summarise(message, &[], metadata).await);
            }
        };

        let query = options.retrieval_query.as_deref().unwrap_or(message);
        let limit = options.max_results.unwrap_or(DEFAULT_MAX_RESULTS).max(1);

        let hits = match retriever.search(query, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, query, "Retrieval failed");
                metadata.insert("tool_run_count".to_string(), json!(1));
                return Ok(ExecutionResult::failure_with_metadata(
                    e.to_string(),
                    metadata,
                ));
            }
        };

        metadata.insert("tool_run_count".to_string(), json!(1));
        metadata.insert("results_count".to_string(), json!(hits.len()));
        metadata.insert(
            "sources".to_string(),
            json!(hits
                .iter()
                .map(|h| json!({"title": h.title, "url": h.url}))
                .collect::<Vec<_>>()),
        );

        if hits.is_empty() {
            return Ok(ExecutionResult::failure_with_metadata(
                format!("No search results found for '{}'", query),
                metadata,
            ));
        }

        Ok(self.summarise(message, &hits, metadata).await)
    }

    fn capabilities(&self) -> Vec<String> {
        let mut capabilities = vec![
            "web_search".to_string(),
            "summarization".to_string(),
            "source_attribution".to_string(),
        ];
        if self.retriever.is_none() {
            capabilities.retain(|c| c == "summarization");
        }
        capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{ScriptedLlm, StaticRetriever};

    fn hit(title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: format!("https://{}.example", title.to_lowercase()),
            content: format!("About {}", title),
        }
    }

    #[tokio::test]
    async fn retrieves_then_summarises_with_tool_count() {
        let llm = Arc::new(ScriptedLlm::replying("Summary [1]"));
        let retriever = Arc::new(StaticRetriever::with_hits(vec![hit("Leica"), hit("Nikon")]));
        let agent = SearchAgent::new(llm.clone(), Some(retriever.clone()), 0.3, 512);

        let options = ExecuteOptions {
            use_tools: true,
            max_results: Some(3),
            retrieval_query: Some("rangefinders".to_string()),
            context: None,
        };
        let result = agent.execute("Search for rangefinders", &options).await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.content(), "Summary [1]");
        assert_eq!(result.metadata()["tool_run_count"], 1);
        assert_eq!(result.metadata()["results_count"], 2);
        assert_eq!(result.metadata()["sources"].as_array().unwrap().len(), 2);
        assert_eq!(retriever.queries(), vec![("rangefinders".to_string(), 3)]);

        let sent = llm.last_request().unwrap();
        assert!(sent.messages[1].content.contains("[2] Nikon"));
    }

    #[tokio::test]
    async fn empty_results_are_a_failure() {
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let retriever = Arc::new(StaticRetriever::with_hits(vec![]));
        let agent = SearchAgent::new(llm.clone(), Some(retriever), 0.3, 512);

        let result = agent
            .execute("nothing", &ExecuteOptions::with_tools())
            .await
            .unwrap();

        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("No search results"));
        assert!(llm.last_request().is_none());
    }

    #[tokio::test]
    async fn retrieval_errors_are_a_failure() {
        let agent = SearchAgent::new(
            Arc::new(ScriptedLlm::replying("unused")),
            Some(Arc::new(StaticRetriever::failing())),
            0.3,
            512,
        );

        let result = agent
            .execute("anything", &ExecuteOptions::with_tools())
            .await
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(result.metadata()["tool_run_count"], 1);
    }

    #[tokio::test]
    async fn without_tools_answers_directly() {
        let retriever = Arc::new(StaticRetriever::with_hits(vec![hit("Unused")]));
        let agent = SearchAgent::new(
            Arc::new(ScriptedLlm::replying("From memory")),
            Some(retriever.clone()),
            0.3,
            512,
        );

        let result = agent
            .execute("question", &ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(result.content(), "From memory");
        assert_eq!(result.metadata()["tool_run_count"], 0);
        assert!(retriever.queries().is_empty());
    }

    #[test]
    fn capabilities_reflect_retriever_availability() {
        let with = SearchAgent::new(
            Arc::new(ScriptedLlm::replying("")),
            Some(Arc::new(StaticRetriever::with_hits(vec![]))),
            0.3,
            512,
        );
        let without = SearchAgent::new(Arc::new(ScriptedLlm::replying("")), None, 0.3, 512);

        assert_eq!(with.capabilities()[0], "web_search");
        assert_eq!(without.capabilities(), vec!["summarization".to_string()]);
    }
}
