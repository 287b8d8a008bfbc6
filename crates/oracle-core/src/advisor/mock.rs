//! Mock advisor for testing
//!
//! Returns predictable advice without a running LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::NarrativeAdvisor;

/// Mock narrative advisor
#[derive(Clone)]
pub struct MockAdvisor {
    /// Whether calls succeed
    pub healthy: bool,
    /// Canned reply; defaults to an echo of the prompt
    pub reply: Option<String>,
}

impl Default for MockAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdvisor {
    /// Create a new mock advisor (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: None,
        }
    }

    /// Create a failing mock advisor
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            reply: None,
        }
    }

    /// Create a mock advisor with a canned reply
    pub fn with_reply(reply: &str) -> Self {
        Self {
            healthy: true,
            reply: Some(reply.to_string()),
        }
    }
}

#[async_trait]
impl NarrativeAdvisor for MockAdvisor {
    async fn advise(&self, _context: &str, prompt: &str) -> Result<String> {
        if !self.healthy {
            return Err(Error::Advisor("Mock backend is unhealthy".to_string()));
        }
        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock advice for: {}", prompt)))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
