//! The simulation engine
//!
//! Data flows one way: snapshot -> {baseline, scenario} projections
//! (independent, sharing only the starting snapshot) -> risk scoring and
//! resource forecasting (derived from the scenario projection) -> one
//! aggregated report. Nothing here retains state between calls.

mod baseline;
mod coordinator;
mod resources;
mod risk;
mod scenario;

pub use baseline::BaselineProjector;
pub use coordinator::SimulationCoordinator;
pub use resources::ResourceForecaster;
pub use risk::{RiskBreakdown, RiskDriver, RiskScorer};
pub use scenario::ScenarioProjector;

/// Projection horizon in months. Every trajectory has exactly this many
/// entries.
pub const HORIZON_MONTHS: usize = 12;

/// Multiply a cent amount by a rate and round back to cents.
pub(crate) fn mul_round(cents: i64, factor: f64) -> i64 {
    (cents as f64 * factor).round() as i64
}

/// Per-month scenario revenue relative to current recurring revenue.
///
/// Used to evolve workload over the horizon: delivered work is assumed to
/// track delivered revenue. When there is no recurring revenue to index
/// against the factor is 1.0, which keeps utilization flat.
pub(crate) fn revenue_index(
    monthly_retainers: i64,
    months: &[crate::models::MonthlyFigures],
) -> Vec<f64> {
    months
        .iter()
        .map(|m| {
            if monthly_retainers > 0 {
                m.revenue as f64 / monthly_retainers as f64
            } else {
                1.0
            }
        })
        .collect()
}
