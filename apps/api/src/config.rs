// Runtime configuration
//
// Everything is read from the environment (optionally seeded from `.env` by
// the binaries). Missing or malformed required settings stop the process
// before it serves any request.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Settings shared by every agent instance
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub image_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// SearXNG-compatible JSON endpoint; search runs without retrieval if unset
    pub search_api_url: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout_secs: 60,
            search_api_url: None,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    pub agents: AgentConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url =
            get("DATABASE_URL").ok_or_else(|| ConfigError::Missing("DATABASE_URL".to_string()))?;

        let defaults = AgentConfig::default();
        let agents = AgentConfig {
            api_key: get("LLM_API_KEY").unwrap_or_default(),
            base_url: get("LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: get("LLM_MODEL").unwrap_or(defaults.model),
            image_model: get("IMAGE_MODEL").unwrap_or(defaults.image_model),
            temperature: parse_or(&get, "LLM_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_or(&get, "LLM_MAX_TOKENS", defaults.max_tokens)?,
            timeout_secs: parse_or(&get, "LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
            search_api_url: get("SEARCH_API_URL"),
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 5)?,
            host: parse_or(&get, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&get, "PORT", 8001)?,
            cors_origins,
            agents,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL".to_string()));
    }

    #[test]
    fn blank_database_url_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db")])).unwrap();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8001");
        assert_eq!(config.max_connections, 5);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.agents, AgentConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("LLM_MODEL", "gpt-4o"),
            ("LLM_TEMPERATURE", "0.2"),
            ("SEARCH_API_URL", "http://searx:8080/search"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.agents.model, "gpt-4o");
        assert_eq!(config.agents.temperature, 0.2);
        assert_eq!(
            config.agents.search_api_url.as_deref(),
            Some("http://searx:8080/search")
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT".to_string(),
                value: "eighty".to_string()
            }
        );
    }
}
