// External retrieval used by the search agent

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{AgentError, AgentResult};

/// A single retrieved source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> AgentResult<Vec<SearchHit>>;
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Retriever for SearXNG-style JSON search endpoints
pub struct SearxRetriever {
    http: Client,
    endpoint: String,
}

impl SearxRetriever {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> AgentResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AgentError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Retriever for SearxRetriever {
    async fn search(&self, query: &str, limit: usize) -> AgentResult<Vec<SearchHit>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| AgentError::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AgentError::Retrieval(format!(
                "Search endpoint returned {}",
                response.status()
            )));
        }

        let body: SearxResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Retrieval(format!("Invalid search response: {}", e)))?;

        Ok(body.results.into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn search_truncates_to_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "tilt shift"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "One", "url": "https://one.example", "content": "first"},
                    {"title": "Two", "url": "https://two.example"},
                    {"title": "Three", "url": "https://three.example"}
                ]
            })))
            .mount(&server)
            .await;

        let retriever = SearxRetriever::new(format!("{}/search", server.uri()), 5).unwrap();
        let hits = retriever.search("tilt shift", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "One");
        assert_eq!(hits[1].content, "");
    }

    #[tokio::test]
    async fn search_surfaces_endpoint_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let retriever = SearxRetriever::new(server.uri(), 5).unwrap();
        let err = retriever.search("anything", 5).await.unwrap_err();

        assert!(matches!(err, AgentError::Retrieval(_)));
    }
}
