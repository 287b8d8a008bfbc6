//! Narrative advisor abstraction
//!
//! The engine's responsibility for narrative advice ends at building a
//! context string and applying a timeout: the free-text generator itself is
//! an external collaborator behind the `NarrativeAdvisor` trait. Advice is
//! supplementary, not load-bearing — any backend failure or timeout resolves
//! to a static fallback message, never an error to the caller.
//!
//! # Configuration
//!
//! Environment variables:
//! - `OLLAMA_HOST`: Ollama server URL (unset ⇒ fallback-only mode)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod mock;
mod ollama;

pub use mock::MockAdvisor;
pub use ollama::OllamaAdvisor;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// Static advice returned whenever the backend is unavailable.
pub const FALLBACK_ADVICE: &str = "The strategy advisor is currently unavailable. \
Review the projected cash trajectory and risk drivers directly: prioritize \
extending runway before committing to new fixed costs.";

/// Capability interface for the external narrative generator.
///
/// One method, swappable behind the trait; the engine depends only on this
/// interface, never on a specific backend.
#[async_trait]
pub trait NarrativeAdvisor: Send + Sync {
    /// Generate free-form advice for a simulation context and prompt.
    async fn advise(&self, context: &str, prompt: &str) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}

/// Concrete advisor enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AdvisorClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaAdvisor),
    /// Mock backend for testing
    Mock(MockAdvisor),
}

impl AdvisorClient {
    /// Create an advisor from environment variables.
    ///
    /// Returns None if `OLLAMA_HOST` is not set; callers then serve the
    /// fallback message unconditionally.
    pub fn from_env() -> Option<Self> {
        OllamaAdvisor::from_env().map(AdvisorClient::Ollama)
    }

    /// Create an Ollama advisor directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AdvisorClient::Ollama(OllamaAdvisor::new(host, model))
    }

    /// Create a mock advisor for testing
    pub fn mock() -> Self {
        AdvisorClient::Mock(MockAdvisor::new())
    }

    /// Advise, resolving every failure to the static fallback.
    ///
    /// This is the call sites' entry point: it cannot fail, only degrade.
    pub async fn advise_or_fallback(&self, context: &str, prompt: &str) -> String {
        match self.advise(context, prompt).await {
            Ok(advice) if !advice.trim().is_empty() => advice,
            Ok(_) => {
                warn!(backend = self.backend_name(), "Advisor returned empty advice, using fallback");
                FALLBACK_ADVICE.to_string()
            }
            Err(e) => {
                warn!(backend = self.backend_name(), error = %e, "Advisor call failed, using fallback");
                FALLBACK_ADVICE.to_string()
            }
        }
    }
}

// Implement NarrativeAdvisor for AdvisorClient by delegating to the inner backend
#[async_trait]
impl NarrativeAdvisor for AdvisorClient {
    async fn advise(&self, context: &str, prompt: &str) -> Result<String> {
        match self {
            AdvisorClient::Ollama(b) => b.advise(context, prompt).await,
            AdvisorClient::Mock(b) => b.advise(context, prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdvisorClient::Ollama(b) => b.health_check().await,
            AdvisorClient::Mock(b) => b.health_check().await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            AdvisorClient::Ollama(b) => b.backend_name(),
            AdvisorClient::Mock(b) => b.backend_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_advisor_round_trip() {
        let client = AdvisorClient::mock();
        let advice = client
            .advise_or_fallback("month 12 comparison", "what should we do?")
            .await;
        assert!(!advice.is_empty());
        assert_ne!(advice, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn test_failing_backend_resolves_to_fallback() {
        let client = AdvisorClient::Mock(MockAdvisor::unhealthy());
        let advice = client.advise_or_fallback("ctx", "prompt").await;
        assert_eq!(advice, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn test_unreachable_ollama_resolves_to_fallback() {
        // Nothing listens on this port
        let client = AdvisorClient::ollama("http://127.0.0.1:1", "llama3.2");
        let advice = client.advise_or_fallback("ctx", "prompt").await;
        assert_eq!(advice, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn test_ollama_backend_against_mock_server() {
        let mut server = crate::test_utils::MockOllamaServer::start().await;
        let client = AdvisorClient::ollama(&server.url(), "llama3.2");

        assert!(client.health_check().await);
        let advice = client
            .advise_or_fallback("cash trajectory", "how do we extend runway?")
            .await;
        assert!(advice.contains("runway"));
        assert_ne!(advice, FALLBACK_ADVICE);

        server.stop();
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_to_fallback() {
        let mut server = crate::test_utils::MockOllamaServer::start_hanging().await;
        let advisor = OllamaAdvisor::new(&server.url(), "llama3.2")
            .with_timeout(std::time::Duration::from_millis(200));
        let client = AdvisorClient::Ollama(advisor);

        let advice = client.advise_or_fallback("ctx", "prompt").await;
        assert_eq!(advice, FALLBACK_ADVICE);

        server.stop();
    }

    #[tokio::test]
    async fn test_ollama_server_error_resolves_to_fallback() {
        let mut server = crate::test_utils::MockOllamaServer::start_failing().await;
        let client = AdvisorClient::ollama(&server.url(), "llama3.2");

        let advice = client.advise_or_fallback("ctx", "prompt").await;
        assert_eq!(advice, FALLBACK_ADVICE);

        server.stop();
    }
}
