//! Oracle Web Server
//!
//! Axum-based REST API exposing the simulation engine to the rest of the
//! agency platform.
//!
//! - `POST /oracle/simulate` runs one scenario simulation
//! - `POST /oracle/advisor` proxies the narrative advisor (always 200)
//! - `GET /oracle/snapshot` reads the current financial snapshot
//! - `POST /oracle/seed` loads demo records for development
//!
//! Authentication and role-based access live at the platform gateway, not
//! here; the router still ships restrictive CORS and security headers.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use oracle_core::{AdvisorClient, Database, NarrativeAdvisor, TierTable};

mod handlers;

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub tiers: TierTable,
    /// Narrative advisor backend; None means fallback-only mode
    pub advisor: Option<AdvisorClient>,
}

/// Create the application router
pub fn create_router(db: Database, tiers: TierTable) -> Router {
    let advisor = AdvisorClient::from_env();
    create_router_with_advisor(db, tiers, advisor)
}

/// Create the application router with an explicit advisor backend (for testing)
pub fn create_router_with_advisor(
    db: Database,
    tiers: TierTable,
    advisor: Option<AdvisorClient>,
) -> Router {
    match advisor {
        Some(AdvisorClient::Ollama(ref backend)) => {
            info!(
                backend = backend.backend_name(),
                host = backend.host(),
                model = backend.model(),
                "Advisor backend configured"
            );
        }
        Some(ref client) => {
            info!(backend = client.backend_name(), "Advisor backend configured");
        }
        None => {
            info!("Advisor backend not configured (set OLLAMA_HOST to enable); serving fallback advice");
        }
    }

    let state = Arc::new(AppState { db, tiers, advisor });

    let api_routes = Router::new()
        .route("/simulate", post(handlers::run_simulation))
        .route("/advisor", post(handlers::ask_advisor))
        .route("/snapshot", get(handlers::get_snapshot))
        .route("/seed", post(handlers::seed_demo));

    // Restrictive CORS: same-origin only, JSON API methods
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/oracle", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(db: Database, tiers: TierTable, host: &str, port: u16) -> anyhow::Result<()> {
    check_advisor_connection().await;

    let app = create_router(db, tiers);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log advisor backend connection status
async fn check_advisor_connection() {
    match AdvisorClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(backend = client.backend_name(), "Advisor backend connected");
            } else {
                warn!(
                    backend = client.backend_name(),
                    "Advisor backend configured but not responding; fallback advice will be served"
                );
            }
        }
        None => {
            info!("Advisor backend not configured (set OLLAMA_HOST to enable)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<oracle_core::Error> for AppError {
    fn from(err: oracle_core::Error) -> Self {
        match err {
            oracle_core::Error::InvalidScenario(msg) => Self::bad_request(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests;
