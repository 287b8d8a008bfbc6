//! Scenario projection
//!
//! Advances the same starting snapshot forward 12 months with the scenario's
//! hypothetical deltas applied: compounding churn against recurring revenue,
//! gradual pipeline conversion under the growth rate, the market multiplier
//! on both, step hiring cost, and the expense multiplier on recurring costs.
//!
//! Policy notes (fixed across calls):
//! - All planned hires start month 1 — a step cost, not a staggered
//!   onboarding schedule.
//! - Pipeline converts gradually: one twelfth of pipeline value per month at
//!   the effective growth rate.
//! - Effective churn/growth are clamped to [0,1] after the market
//!   adjustment. Caller input is validated upstream, never clamped here.
//! - Projection continues through negative cash; runway detection is a
//!   downstream concern.

use crate::models::{FinancialSnapshot, MonthlyFigures, SimulationScenario};
use crate::tiers::TierTable;

use super::{mul_round, HORIZON_MONTHS};

pub struct ScenarioProjector<'a> {
    tiers: &'a TierTable,
}

impl<'a> ScenarioProjector<'a> {
    pub fn new(tiers: &'a TierTable) -> Self {
        Self { tiers }
    }

    /// Effective monthly churn fraction after the market adjustment.
    pub fn effective_churn(scenario: &SimulationScenario) -> f64 {
        let base = scenario.client_churn_rate.clamp(0.0, 100.0) / 100.0;
        (base * scenario.market_condition.churn_factor()).clamp(0.0, 1.0)
    }

    /// Effective monthly growth fraction after the market adjustment.
    pub fn effective_growth(scenario: &SimulationScenario) -> f64 {
        let base = scenario.new_client_growth.clamp(0.0, 100.0) / 100.0;
        (base * scenario.market_condition.growth_factor()).clamp(0.0, 1.0)
    }

    /// Project the scenario trajectory, independently of the baseline's
    /// running total.
    pub fn project(
        &self,
        snapshot: &FinancialSnapshot,
        scenario: &SimulationScenario,
    ) -> Vec<MonthlyFigures> {
        let churn = Self::effective_churn(scenario);
        let growth = Self::effective_growth(scenario);
        let new_hire_cost = self.tiers.plan_monthly_cost(&scenario.hiring_plan);
        let pipeline_conversion = mul_round(snapshot.pipeline_value, growth / 12.0);
        let adjusted_costs = mul_round(
            snapshot.monthly_recurring_costs,
            scenario.expense_multiplier,
        );
        let expenses = snapshot.monthly_payroll + new_hire_cost + adjusted_costs;

        let mut months = Vec::with_capacity(HORIZON_MONTHS);
        let mut recurring = snapshot.monthly_retainers;
        let mut cash = snapshot.starting_cash;

        for _ in 0..HORIZON_MONTHS {
            recurring = mul_round(recurring, 1.0 - churn) + pipeline_conversion;
            cash += recurring - expenses;
            months.push(MonthlyFigures {
                revenue: recurring,
                expenses,
                cash_reserve: cash,
            });
        }

        months
    }
}
