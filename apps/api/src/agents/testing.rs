// Scripted backends for agent unit tests

use async_trait::async_trait;
use std::sync::Mutex;

use super::errors::{AgentError, AgentResult};
use super::llm::{Completion, CompletionRequest, GeneratedImage, LlmClient};
use super::retrieval::{Retriever, SearchHit};

pub struct ScriptedLlm {
    reply: Result<String, String>,
    image: Option<GeneratedImage>,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn replying(content: &str) -> Self {
        Self {
            reply: Ok(content.to_string()),
            image: None,
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            image: None,
            last_request: Mutex::new(None),
        }
    }

    pub fn with_image(mut self, url: &str, revised_prompt: Option<&str>) -> Self {
        self.image = Some(GeneratedImage {
            url: url.to_string(),
            revised_prompt: revised_prompt.map(str::to_string),
        });
        self
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> AgentResult<Completion> {
        *self.last_request.lock().unwrap() = Some(request);
        match &self.reply {
            Ok(content) => Ok(Completion {
                content: content.clone(),
                model: "scripted".to_string(),
                prompt_tokens: Some(10),
                completion_tokens: Some(5),
            }),
            Err(message) => Err(AgentError::LlmError(message.clone())),
        }
    }

    async fn generate_image(&self, _prompt: &str) -> AgentResult<GeneratedImage> {
        match (&self.image, &self.reply) {
            (Some(image), _) => Ok(image.clone()),
            (None, Err(message)) => Err(AgentError::LlmError(message.clone())),
            (None, Ok(_)) => Err(AgentError::LlmError("no image scripted".to_string())),
        }
    }
}

pub struct StaticRetriever {
    hits: Option<Vec<SearchHit>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticRetriever {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits: Some(hits),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            hits: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search(&self, query: &str, limit: usize) -> AgentResult<Vec<SearchHit>> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        match &self.hits {
            Some(hits) => Ok(hits.iter().take(limit).cloned().collect()),
            None => Err(AgentError::Retrieval("search backend offline".to_string())),
        }
    }
}
