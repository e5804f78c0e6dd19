// LLM backend port and its OpenAI-compatible adapter
//
// Agents talk to the model through `LlmClient` so tests and alternative
// providers can be swapped in without touching agent logic.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{AgentError, AgentResult};
use crate::config::AgentConfig;

/// A single chat message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// Either a remote URL or a `data:` URI
    pub url: String,
    pub revised_prompt: Option<String>,
}

/// Text and image generation backend
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> AgentResult<Completion>;

    async fn generate_image(&self, prompt: &str) -> AgentResult<GeneratedImage>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
    revised_prompt: Option<String>,
}

/// Client for any API that speaks the OpenAI chat-completions and
/// image-generations protocol
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    image_model: String,
}

impl OpenAiClient {
    /// Builds a client from agent configuration
    ///
    /// # Errors
    /// Returns `AgentError::ConfigError` if the HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> AgentResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> AgentResult<R> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::LlmError(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::LlmError(format!(
                "{} returned {}: {}",
                path, status, text
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AgentError::LlmError(format!("Invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> AgentResult<Completion> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response: ChatCompletionResponse = self.post("/chat/completions", &body).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::LlmError("Response contained no choices".to_string()))?;

        Ok(Completion {
            content: choice.message.content,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            prompt_tokens: response.usage.as_ref().and_then(|u| u.prompt_tokens),
            completion_tokens: response.usage.as_ref().and_then(|u| u.completion_tokens),
        })
    }

    async fn generate_image(&self, prompt: &str) -> AgentResult<GeneratedImage> {
        let body = ImageGenerationBody {
            model: &self.image_model,
            prompt,
            n: 1,
            size: "1024x1024",
        };

        let response: ImageGenerationResponse = self.post("/images/generations", &body).await?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::LlmError("Response contained no images".to_string()))?;

        let url = match (image.url, image.b64_json) {
            (Some(url), _) => url,
            (None, Some(b64)) => format!("data:image/png;base64,{}", b64),
            (None, None) => {
                return Err(AgentError::LlmError(
                    "Image response had neither url nor b64_json".to_string(),
                ))
            }
        };

        Ok(GeneratedImage {
            url,
            revised_prompt: image.revised_prompt,
        })
    }
}
