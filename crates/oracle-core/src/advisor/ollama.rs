//! Ollama advisor backend
//!
//! HTTP client for the Ollama generate API. Every call is bounded by a
//! timeout so the advisor can never stall a caller; the simulate path does
//! not depend on this backend at all.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::NarrativeAdvisor;

/// Default bound on one advisor call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct OllamaAdvisor {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaAdvisor {
    /// Create a new Ollama advisor
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    /// Host URL (for logging)
    pub fn host(&self) -> &str {
        &self.base_url
    }

    /// Model name (for logging)
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl NarrativeAdvisor for OllamaAdvisor {
    async fn advise(&self, context: &str, prompt: &str) -> Result<String> {
        let full_prompt = format!(
            "You are a strategy advisor for a creative agency. Given this \
             simulation context, answer the question concisely and concretely.\n\n\
             Context:\n{}\n\nQuestion: {}",
            context, prompt
        );

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: full_prompt,
            stream: false,
        };

        let send = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send();

        let response = send
            .await
            .map_err(|e| Error::Advisor(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Advisor(format!(
                "Backend returned {}",
                response.status()
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| Error::Advisor(format!("Invalid response body: {}", e)))?;

        debug!(chars = ollama_response.response.len(), "Advisor response received");
        Ok(ollama_response.response.trim().to_string())
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(3))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn backend_name(&self) -> &'static str {
        "ollama"
    }
}
