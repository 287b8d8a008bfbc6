//! Simulation and advisor handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use oracle_core::{
    FinancialSnapshot, SimulationCoordinator, SimulationReport, SimulationScenario,
    SnapshotBuilder, FALLBACK_ADVICE,
};

/// Request body for POST /oracle/simulate
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub scenario: SimulationScenario,
}

/// POST /oracle/simulate - Run one scenario simulation
///
/// Body errors (malformed JSON, negative headcounts rejected at the
/// unsigned type) are client errors, so the extractor rejection maps to
/// 400 rather than axum's default 422.
pub async fn run_simulation(
    State(state): State<Arc<AppState>>,
    request: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulationReport>, AppError> {
    let Json(request) = request.map_err(|e| AppError::bad_request(&e.body_text()))?;
    let coordinator = SimulationCoordinator::new(&state.db, &state.tiers);
    let report = coordinator.simulate(&request.scenario)?;

    info!(
        risk_level = ?report.risk_level,
        degraded = report.degraded.len(),
        "Simulation completed"
    );

    Ok(Json(report))
}

/// Request body for POST /oracle/advisor
#[derive(Debug, Deserialize)]
pub struct AdvisorRequest {
    pub context: String,
    pub prompt: String,
}

/// Response body for POST /oracle/advisor
#[derive(Debug, Serialize)]
pub struct AdvisorResponse {
    pub advice: String,
}

/// POST /oracle/advisor - Ask the narrative advisor
///
/// Always returns 200: backend failures and absent configuration both
/// resolve to the static fallback message.
pub async fn ask_advisor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdvisorRequest>,
) -> Json<AdvisorResponse> {
    let advice = match &state.advisor {
        Some(client) => {
            client
                .advise_or_fallback(&request.context, &request.prompt)
                .await
        }
        None => FALLBACK_ADVICE.to_string(),
    };

    Json(AdvisorResponse { advice })
}

/// Response body for GET /oracle/snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub snapshot: FinancialSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<String>,
}

/// GET /oracle/snapshot - Read the current financial snapshot
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SnapshotResponse>, AppError> {
    let (snapshot, degraded) = SnapshotBuilder::new(&state.db).build();
    Ok(Json(SnapshotResponse { snapshot, degraded }))
}

/// Response for POST /oracle/seed
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
}

/// POST /oracle/seed - Load demo agency records (development convenience)
pub async fn seed_demo(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeedResponse>, AppError> {
    state.db.seed_demo_records()?;
    info!("Demo records seeded");
    Ok(Json(SeedResponse { success: true }))
}
