//! Oracle Core Library
//!
//! The predictive simulation engine for the agency management platform:
//! - Business-record store the snapshot builder aggregates over
//! - Financial snapshot assembly with graceful degradation
//! - Baseline and scenario projectors (parallel 12-month trajectories)
//! - Risk scoring and per-staff resource forecasting
//! - Simulation coordinator producing one report per request
//! - Narrative advisor abstraction over an external text generator

pub mod advisor;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod tiers;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{AdvisorClient, MockAdvisor, NarrativeAdvisor, OllamaAdvisor, FALLBACK_ADVICE};
pub use db::{Database, LedgerKind, StaffMember, StaffWorkload};
pub use engine::{
    BaselineProjector, ResourceForecaster, RiskScorer, ScenarioProjector, SimulationCoordinator,
    HORIZON_MONTHS,
};
pub use error::{Error, Result};
pub use models::{
    FinancialSnapshot, MarketCondition, MonthlyFigures, ResourceForecast, RiskLevel,
    SimulationMonth, SimulationReport, SimulationScenario, UtilizationTrend,
};
pub use snapshot::SnapshotBuilder;
pub use tiers::{TierProfile, TierTable};
