//! Test utilities for oracle-core
//!
//! Provides a mock Ollama server for advisor integration tests without a
//! running LLM backend.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock Ollama server for testing
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

        Self::serve(app).await
    }

    /// Start a mock server whose generate endpoint always errors
    pub async fn start_failing() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate_error));

        Self::serve(app).await
    }

    /// Start a mock server whose generate endpoint stalls far past any
    /// reasonable client timeout
    pub async fn start_hanging() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate_hanging));

        Self::serve(app).await
    }

    async fn serve(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
        }],
    })
}

/// Ollama generate endpoint: echoes a canned advisory line
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let response = if request.prompt.contains("strategy advisor") {
        "Extend runway before adding fixed costs; the scenario's churn \
         exposure is the main driver."
            .to_string()
    } else {
        "Mock generated text.".to_string()
    };

    Json(GenerateResponse { response })
}

/// Generate endpoint that never answers in time
async fn handle_generate_hanging(
    Json(_request): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
    Json(GenerateResponse {
        response: "Too late to matter.".to_string(),
    })
}

/// Always-failing generate endpoint
async fn handle_generate_error(
    Json(_request): Json<GenerateRequest>,
) -> (axum::http::StatusCode, &'static str) {
    (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "model crashed")
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[allow(dead_code)]
    model: String,
    prompt: String,
    #[allow(dead_code)]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
}
