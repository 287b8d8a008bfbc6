//! Simulation coordination
//!
//! Orchestrates snapshot assembly, the two projections, risk scoring, and
//! resource forecasting into one response payload per request. Stateless:
//! every entity is constructed fresh per call and discarded with the
//! response; no simulation history is retained anywhere.

use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    format_cents, RiskLevel, SimulationMonth, SimulationReport, SimulationScenario,
};
use crate::snapshot::SnapshotBuilder;
use crate::tiers::TierTable;

use super::{
    revenue_index, BaselineProjector, ResourceForecaster, RiskDriver, RiskScorer,
    ScenarioProjector, HORIZON_MONTHS,
};

pub struct SimulationCoordinator<'a> {
    db: &'a Database,
    tiers: &'a TierTable,
}

impl<'a> SimulationCoordinator<'a> {
    pub fn new(db: &'a Database, tiers: &'a TierTable) -> Self {
        Self { db, tiers }
    }

    /// Validate caller input. Out-of-range values are rejected, never
    /// clamped — clamping is reserved for internally-derived values, so bad
    /// requests stay visible.
    pub fn validate(scenario: &SimulationScenario, tiers: &TierTable) -> Result<()> {
        if !(0.0..=100.0).contains(&scenario.client_churn_rate) {
            return Err(Error::InvalidScenario(format!(
                "clientChurnRate must be within [0, 100], got {}",
                scenario.client_churn_rate
            )));
        }
        if !(0.0..=100.0).contains(&scenario.new_client_growth) {
            return Err(Error::InvalidScenario(format!(
                "newClientGrowth must be within [0, 100], got {}",
                scenario.new_client_growth
            )));
        }
        if !scenario.expense_multiplier.is_finite() || scenario.expense_multiplier <= 0.0 {
            return Err(Error::InvalidScenario(format!(
                "expenseMultiplier must be a positive number, got {}",
                scenario.expense_multiplier
            )));
        }
        for tier in scenario.hiring_plan.keys() {
            if !tiers.contains(tier) {
                return Err(Error::InvalidScenario(format!(
                    "Unknown hiring tier '{}' (registered: {})",
                    tier,
                    tiers.labels().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Run one simulation. Rejects invalid scenarios before touching any
    /// records; degrades gracefully when record aggregates are unavailable.
    pub fn simulate(&self, scenario: &SimulationScenario) -> Result<SimulationReport> {
        Self::validate(scenario, self.tiers)?;

        let (snapshot, mut degraded) = SnapshotBuilder::new(self.db).build();
        let baseline = BaselineProjector::project(&snapshot);
        let projected = ScenarioProjector::new(self.tiers).project(&snapshot, scenario);
        let index = revenue_index(snapshot.monthly_retainers, &projected);

        // Staffing reads degrade like snapshot aggregates: an empty resource
        // forecast with a flag beats refusing to forecast
        let (team_utilization, resources) = match ResourceForecaster::load(self.db, self.tiers) {
            Ok(forecaster) => (
                forecaster.monthly_team_utilization(scenario, &index),
                forecaster.forecast(scenario, &index),
            ),
            Err(e) => {
                warn!(error = %e, "Staffing records unavailable, resource forecast skipped");
                degraded.push("staffWorkloads".to_string());
                (vec![0.0; HORIZON_MONTHS], Vec::new())
            }
        };

        let mut results = Vec::with_capacity(HORIZON_MONTHS);
        let mut last_breakdown = None;
        let mut prev_cash = snapshot.starting_cash;

        for (i, figures) in projected.iter().enumerate() {
            let breakdown = RiskScorer::score(prev_cash, figures, team_utilization[i]);
            results.push(SimulationMonth {
                month: i as u32 + 1,
                baseline: baseline[i],
                scenario: *figures,
                team_utilization: team_utilization[i],
                risk_score: breakdown.score,
            });
            prev_cash = figures.cash_reserve;
            last_breakdown = Some(breakdown);
        }

        // Horizon is fixed, so the last month always exists
        let final_breakdown = last_breakdown
            .ok_or_else(|| Error::DataUnavailable("Empty projection horizon".to_string()))?;
        let risk_level = RiskLevel::from_score(final_breakdown.score);

        let final_month = &results[results.len() - 1];
        let prediction = format!(
            "Month 12 cash reserve: {} under the scenario vs {} baseline ({} difference)",
            format_cents(final_month.scenario.cash_reserve),
            format_cents(final_month.baseline.cash_reserve),
            format_cents(final_month.scenario.cash_reserve - final_month.baseline.cash_reserve),
        );
        let recommendation = Self::recommendation(risk_level, final_breakdown.driver);

        debug!(
            risk_level = %risk_level,
            month12_score = final_breakdown.score,
            degraded = degraded.len(),
            "Simulation complete"
        );

        Ok(SimulationReport {
            results,
            resources,
            financial_snapshot: snapshot,
            risk_level,
            prediction,
            recommendation,
            degraded,
        })
    }

    /// Short deterministic templated string naming the dominant risk driver.
    fn recommendation(level: RiskLevel, driver: RiskDriver) -> String {
        if level == RiskLevel::Low {
            return format!(
                "{} risk at month 12. The scenario is sustainable as projected; no corrective action indicated.",
                level
            );
        }

        let advice = match driver {
            RiskDriver::CashTrend => {
                "Cash reserves are declining month over month; revisit churn exposure or scale back the hiring plan."
            }
            RiskDriver::Runway => {
                "Runway is the dominant risk: reserves approach depletion within the horizon; reduce burn or accelerate pipeline conversion."
            }
            RiskDriver::Utilization => {
                "Team utilization sits outside the sustainable band; rebalance the hiring plan against assigned work."
            }
        };

        format!("{} risk at month 12. {}", level, advice)
    }
}
