use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::agent::Agent;
use super::errors::AgentResult;
use super::llm::LlmClient;
use super::prompts::{library, PromptTemplate};
use super::types::{AgentKind, ExecuteOptions, ExecutionResult, ImageResult, Metadata};

/// Agent that turns a textual prompt into a generated image
pub struct ImageAgent {
    llm: Arc<dyn LlmClient>,
    prompt: PromptTemplate,
}

impl ImageAgent {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            prompt: library::image_generation(),
        }
    }

    /// Generate an image and describe it
    ///
    /// Never fails: backend errors are reported through
    /// `ImageResult::success == false`, with the reason in `description`.
    pub async fn generate_image(&self, prompt: &str) -> ImageResult {
        if prompt.trim().is_empty() {
            return ImageResult::failed("Image prompt must not be empty");
        }

        let rendered = self.prompt.render_with(&[("prompt", prompt)]);
        match self.llm.generate_image(&rendered).await {
            Ok(image) => {
                let description = image
                    .revised_prompt
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| prompt.to_string());
                ImageResult::generated(image.url, description)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image generation failed");
                ImageResult::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Agent for ImageAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Image
    }

    async fn execute(
        &self,
        message: &str,
        _options: &ExecuteOptions,
    ) -> AgentResult<ExecutionResult> {
        let image = self.generate_image(message).await;

        match image.image_url {
            Some(url) if image.success => {
                let mut metadata = Metadata::new();
                metadata.insert("image_url".to_string(), json!(url));
                Ok(ExecutionResult::success(image.description, metadata))
            }
            _ => Ok(ExecutionResult::failure(image.description)),
        }
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "image_generation".to_string(),
            "image_description".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedLlm;

    #[tokio::test]
    async fn generate_image_prefers_revised_prompt() {
        let llm =
            ScriptedLlm::replying("").with_image("https://img.example/1.png", Some("A misty lake"));
        let agent = ImageAgent::new(Arc::new(llm));

        let result = agent.generate_image("lake at dawn").await;

        assert!(result.success);
        assert_eq!(result.image_url.as_deref(), Some("https://img.example/1.png"));
        assert_eq!(result.description, "A misty lake");
    }

    #[tokio::test]
    async fn generate_image_reports_backend_failure() {
        let agent = ImageAgent::new(Arc::new(ScriptedLlm::failing("quota exceeded")));

        let result = agent.generate_image("lake").await;

        assert!(!result.success);
        assert!(result.image_url.is_none());
        assert!(result.description.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn execute_puts_url_in_metadata() {
        let llm = ScriptedLlm::replying("").with_image("https://img.example/2.png", None);
        let agent = ImageAgent::new(Arc::new(llm));

        let result = agent
            .execute("portrait in golden hour", &ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(result.content(), "portrait in golden hour");
        assert_eq!(result.metadata()["image_url"], "https://img.example/2.png");
    }

    #[tokio::test]
    async fn execute_rejects_blank_prompt() {
        let agent = ImageAgent::new(Arc::new(ScriptedLlm::replying("")));

        let result = agent.execute("  ", &ExecuteOptions::default()).await.unwrap();

        assert_eq!(result.error(), Some("Image prompt must not be empty"));
    }
}
