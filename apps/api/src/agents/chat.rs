use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::agent::Agent;
use super::errors::AgentResult;
use super::llm::{ChatMessage, Completion, CompletionRequest, LlmClient};
use super::prompts::{library, PromptTemplate};
use super::types::{AgentKind, ExecuteOptions, ExecutionResult, Metadata};

/// Free-form conversational agent
pub struct ChatAgent {
    llm: Arc<dyn LlmClient>,
    prompt: PromptTemplate,
    temperature: f32,
    max_tokens: u32,
}

impl ChatAgent {
    pub fn new(llm: Arc<dyn LlmClient>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            llm,
            prompt: library::chat(),
            temperature,
            max_tokens,
        }
    }

    fn build_messages(&self, message: &str, options: &ExecuteOptions) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(&self.prompt.system)];

        if let Some(context) = options.context.as_ref().filter(|c| !c.is_empty()) {
            messages.push(ChatMessage::system(format!(
                "Additional context for this conversation:\n{}",
                serde_json::Value::Object(context.clone())
            )));
        }

        messages.push(ChatMessage::user(
            self.prompt.render_with(&[("message", message)]),
        ));
        messages
    }
}

/// Metadata describing which model answered and what it cost
pub(crate) fn completion_metadata(completion: &Completion, prompt: &PromptTemplate) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("model".to_string(), json!(completion.model));
    metadata.insert(
        "prompt".to_string(),
        json!(format!("{}@{}", prompt.name, prompt.version)),
    );
    if let Some(tokens) = completion.prompt_tokens {
        metadata.insert("prompt_tokens".to_string(), json!(tokens));
    }
    if let Some(tokens) = completion.completion_tokens {
        metadata.insert("completion_tokens".to_string(), json!(tokens));
    }
    metadata
}

#[async_trait]
impl Agent for ChatAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Chat
    }

    async fn execute(
        &self,
        message: &str,
        options: &ExecuteOptions,
    ) -> AgentResult<ExecutionResult> {
        let request = CompletionRequest {
            messages: self.build_messages(message, options),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.llm.complete(request).await {
            Ok(completion) if completion.content.trim().is_empty() => {
                Ok(ExecutionResult::failure("Model returned an empty response"))
            }
            Ok(completion) => {
                let metadata = completion_metadata(&completion, &self.prompt);
                Ok(ExecutionResult::success(completion.content, metadata))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat completion failed");
                Ok(ExecutionResult::failure(e.to_string()))
            }
        }
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "conversation".to_string(),
            "question_answering".to_string(),
            "context_awareness".to_string(),
        ]
    }
}
