//! Resource forecasting
//!
//! Estimates per-worker sustainability from the scenario's implied workload.
//! Monthly load = assigned open hours / tier capacity, diluted when the
//! hiring plan adds people to that tier, and scaled by the scenario revenue
//! index so delivered work tracks delivered revenue over the horizon.
//!
//! Fixed policy constants:
//! - sustained load above 85% counts as overload
//! - burnout risk is twice the average overload, clamped to 0..=100
//! - burnout is projected the first month cumulative overload crosses
//!   150 percentage-point-months
//! - trend uses a two-point dead band on the first-to-last month change

use std::collections::BTreeMap;

use crate::db::{Database, StaffWorkload};
use crate::error::Result;
use crate::models::{ResourceForecast, SimulationScenario, UtilizationTrend};
use crate::tiers::TierTable;

use super::HORIZON_MONTHS;

/// Load percentage above which a month counts toward burnout.
pub const OVERLOAD_THRESHOLD: f64 = 85.0;

/// Cumulative overload (percentage-point-months) that projects burnout.
pub const BURNOUT_TOLERANCE: f64 = 150.0;

/// Dead band for the utilization trend, in percentage points.
const TREND_DEAD_BAND: f64 = 2.0;

pub struct ResourceForecaster<'a> {
    tiers: &'a TierTable,
    workloads: Vec<StaffWorkload>,
    staff_per_tier: BTreeMap<String, u32>,
    /// Capacity hours across the whole current team (idle staff included)
    team_capacity_hours: f64,
}

impl<'a> ResourceForecaster<'a> {
    /// Read current staffing and assignment records once.
    pub fn load(db: &Database, tiers: &'a TierTable) -> Result<Self> {
        let staff = db.list_staff()?;
        let workloads = db.staff_workloads()?;

        let mut staff_per_tier: BTreeMap<String, u32> = BTreeMap::new();
        let mut team_capacity_hours = 0.0;
        for member in &staff {
            *staff_per_tier.entry(member.tier.clone()).or_default() += 1;
            team_capacity_hours += tiers.capacity_hours(&member.tier);
        }

        Ok(Self {
            tiers,
            workloads,
            staff_per_tier,
            team_capacity_hours,
        })
    }

    /// Team-wide utilization percentage for each month of the horizon.
    ///
    /// Capacity includes planned hires from month 1. Never negative; may
    /// exceed 100 when the team is thin.
    pub fn monthly_team_utilization(
        &self,
        scenario: &SimulationScenario,
        revenue_index: &[f64],
    ) -> Vec<f64> {
        let assigned: f64 = self.workloads.iter().map(|w| w.assigned_hours).sum();
        let capacity =
            self.team_capacity_hours + self.tiers.plan_capacity_hours(&scenario.hiring_plan);

        revenue_index
            .iter()
            .take(HORIZON_MONTHS)
            .map(|index| {
                if capacity <= 0.0 {
                    0.0
                } else {
                    (100.0 * assigned * index / capacity).max(0.0)
                }
            })
            .collect()
    }

    /// Forecast each staff member with open assignments.
    pub fn forecast(
        &self,
        scenario: &SimulationScenario,
        revenue_index: &[f64],
    ) -> Vec<ResourceForecast> {
        self.workloads
            .iter()
            .map(|workload| self.forecast_member(workload, scenario, revenue_index))
            .collect()
    }

    fn forecast_member(
        &self,
        workload: &StaffWorkload,
        scenario: &SimulationScenario,
        revenue_index: &[f64],
    ) -> ResourceForecast {
        let loads = self.monthly_loads(workload, scenario, revenue_index);

        let mut cumulative_overload = 0.0;
        let mut months_until_burnout = None;
        let mut total_overload = 0.0;

        for (i, load) in loads.iter().enumerate() {
            let overload = (load - OVERLOAD_THRESHOLD).max(0.0);
            total_overload += overload;
            cumulative_overload += overload;
            if months_until_burnout.is_none() && cumulative_overload >= BURNOUT_TOLERANCE {
                months_until_burnout = Some(i as u32 + 1);
            }
        }

        let avg_overload = total_overload / loads.len() as f64;
        let burnout_risk = (avg_overload * 2.0).round().clamp(0.0, 100.0) as u8;

        let delta = loads[loads.len() - 1] - loads[0];
        let utilization_trend = if delta > TREND_DEAD_BAND {
            UtilizationTrend::Up
        } else if delta < -TREND_DEAD_BAND {
            UtilizationTrend::Down
        } else {
            UtilizationTrend::Stable
        };

        ResourceForecast {
            user_id: workload.user_id,
            user_name: workload.user_name.clone(),
            burnout_risk,
            months_until_burnout,
            utilization_trend,
        }
    }

    /// One staff member's load percentage per month.
    fn monthly_loads(
        &self,
        workload: &StaffWorkload,
        scenario: &SimulationScenario,
        revenue_index: &[f64],
    ) -> Vec<f64> {
        let capacity = self.tiers.capacity_hours(&workload.tier);
        let base_load = if capacity > 0.0 {
            100.0 * workload.assigned_hours / capacity
        } else {
            0.0
        };

        // Hires in this tier dilute per-person load; an empty tier gains
        // nothing to dilute
        let existing = self
            .staff_per_tier
            .get(&workload.tier)
            .copied()
            .unwrap_or(0)
            .max(1);
        let hires = scenario
            .hiring_plan
            .get(&workload.tier)
            .copied()
            .unwrap_or(0);
        let dilution = f64::from(existing) / f64::from(existing + hires);

        revenue_index
            .iter()
            .take(HORIZON_MONTHS)
            .map(|index| (base_load * dilution * index).max(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overloaded_db() -> Database {
        let db = Database::in_memory().unwrap();
        let staff = db.add_staff("Maya", "mid", 850_000).unwrap();
        let client = db.add_client("C", 1_000_000, "active").unwrap();
        let project = db.add_project(client, "P", "active").unwrap();
        // 200h against 160h mid capacity: 125% load
        db.add_task(project, staff, "Big build", "open", 200.0).unwrap();
        db
    }

    fn flat_index() -> Vec<f64> {
        vec![1.0; 12]
    }

    #[test]
    fn test_overloaded_member_has_burnout_within_horizon() {
        let tiers = TierTable::builtin();
        let db = overloaded_db();
        let forecaster = ResourceForecaster::load(&db, &tiers).unwrap();

        let forecasts = forecaster.forecast(&SimulationScenario::neutral(), &flat_index());
        assert_eq!(forecasts.len(), 1);

        let f = &forecasts[0];
        // 125% load: 40pp overload per month, tolerance 150 crossed month 4
        assert_eq!(f.months_until_burnout, Some(4));
        assert_eq!(f.burnout_risk, 80);
        assert_eq!(f.utilization_trend, UtilizationTrend::Stable);
    }

    #[test]
    fn test_hiring_into_tier_dilutes_load() {
        let tiers = TierTable::builtin();
        let db = overloaded_db();
        let forecaster = ResourceForecaster::load(&db, &tiers).unwrap();

        let mut scenario = SimulationScenario::neutral();
        scenario.hiring_plan.insert("mid".to_string(), 1);

        let forecasts = forecaster.forecast(&scenario, &flat_index());
        // Load halves to 62.5%, under the threshold
        assert_eq!(forecasts[0].months_until_burnout, None);
        assert_eq!(forecasts[0].burnout_risk, 0);
    }

    #[test]
    fn test_rising_revenue_index_trends_up() {
        let tiers = TierTable::builtin();
        let db = overloaded_db();
        let forecaster = ResourceForecaster::load(&db, &tiers).unwrap();

        let rising: Vec<f64> = (0..12).map(|i| 1.0 + 0.05 * i as f64).collect();
        let forecasts = forecaster.forecast(&SimulationScenario::neutral(), &rising);
        assert_eq!(forecasts[0].utilization_trend, UtilizationTrend::Up);

        let falling: Vec<f64> = (0..12).map(|i| 1.0 - 0.05 * i as f64).collect();
        let forecasts = forecaster.forecast(&SimulationScenario::neutral(), &falling);
        assert_eq!(forecasts[0].utilization_trend, UtilizationTrend::Down);
    }

    #[test]
    fn test_team_utilization_counts_idle_staff_capacity() {
        let tiers = TierTable::builtin();
        let db = overloaded_db();
        db.add_staff("Idle", "mid", 850_000).unwrap();
        let forecaster = ResourceForecaster::load(&db, &tiers).unwrap();

        let utilization =
            forecaster.monthly_team_utilization(&SimulationScenario::neutral(), &flat_index());
        assert_eq!(utilization.len(), 12);
        // 200h over 320h of capacity
        assert!((utilization[0] - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_team_utilization_is_zero() {
        let tiers = TierTable::builtin();
        let db = Database::in_memory().unwrap();
        let forecaster = ResourceForecaster::load(&db, &tiers).unwrap();

        let utilization =
            forecaster.monthly_team_utilization(&SimulationScenario::neutral(), &flat_index());
        assert!(utilization.iter().all(|u| *u == 0.0));
        assert!(forecaster
            .forecast(&SimulationScenario::neutral(), &flat_index())
            .is_empty());
    }

    #[test]
    fn test_burnout_risk_clamped() {
        let tiers = TierTable::builtin();
        let db = Database::in_memory().unwrap();
        let staff = db.add_staff("Crushed", "mid", 850_000).unwrap();
        let client = db.add_client("C", 1_000_000, "active").unwrap();
        let project = db.add_project(client, "P", "active").unwrap();
        db.add_task(project, staff, "Everything", "open", 500.0).unwrap();

        let forecaster = ResourceForecaster::load(&db, &tiers).unwrap();
        let forecasts = forecaster.forecast(&SimulationScenario::neutral(), &flat_index());
        assert_eq!(forecasts[0].burnout_risk, 100);
        assert_eq!(forecasts[0].months_until_burnout, Some(1));
    }
}
