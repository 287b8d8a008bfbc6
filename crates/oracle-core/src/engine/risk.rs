//! Risk scoring
//!
//! Derives a 0-100 monthly risk score from the scenario trajectory. Three
//! signals, each normalized to [0,1], combine under fixed weights so output
//! is reproducible for identical inputs:
//!
//! - cash trend (weight 30): month-over-month reserve decline, relative to
//!   that month's expenses — declining by a full month of expenses saturates
//!   the signal
//! - runway proximity (weight 40): months until projected depletion at the
//!   current net burn, inverted over the 12-month horizon; depleted reserves
//!   saturate it
//! - utilization (weight 30): distance outside the 60-90% healthy band,
//!   saturating 40 points outside it — thin staffing is delivery risk,
//!   overstaffing is burn risk

use crate::models::MonthlyFigures;

pub const WEIGHT_TREND: f64 = 30.0;
pub const WEIGHT_RUNWAY: f64 = 40.0;
pub const WEIGHT_UTILIZATION: f64 = 30.0;

/// Healthy team utilization band, in percent.
pub const UTILIZATION_BAND: (f64, f64) = (60.0, 90.0);

/// Which signal contributed most to a month's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskDriver {
    CashTrend,
    Runway,
    Utilization,
}

/// A scored month with its dominant driver.
#[derive(Debug, Clone, Copy)]
pub struct RiskBreakdown {
    pub score: u8,
    pub driver: RiskDriver,
}

pub struct RiskScorer;

impl RiskScorer {
    /// Score one scenario month given the prior month's closing reserve.
    pub fn score(
        prev_cash: i64,
        figures: &MonthlyFigures,
        team_utilization: f64,
    ) -> RiskBreakdown {
        let trend = Self::trend_signal(prev_cash, figures);
        let runway = Self::runway_signal(figures);
        let utilization = Self::utilization_signal(team_utilization);

        let weighted = [
            (RiskDriver::Runway, WEIGHT_RUNWAY * runway),
            (RiskDriver::CashTrend, WEIGHT_TREND * trend),
            (RiskDriver::Utilization, WEIGHT_UTILIZATION * utilization),
        ];

        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let score = total.round().clamp(0.0, 100.0) as u8;

        // First entry wins ties, so runway dominates when equal
        let driver = weighted
            .iter()
            .fold(weighted[0], |best, &entry| {
                if entry.1 > best.1 {
                    entry
                } else {
                    best
                }
            })
            .0;

        RiskBreakdown { score, driver }
    }

    fn trend_signal(prev_cash: i64, figures: &MonthlyFigures) -> f64 {
        let decline = prev_cash.saturating_sub(figures.cash_reserve);
        if decline <= 0 {
            return 0.0;
        }
        let denom = figures.expenses.max(1) as f64;
        (decline as f64 / denom).clamp(0.0, 1.0)
    }

    fn runway_signal(figures: &MonthlyFigures) -> f64 {
        if figures.cash_reserve <= 0 {
            return 1.0;
        }
        let net = figures.revenue - figures.expenses;
        if net >= 0 {
            return 0.0;
        }
        let months_left = figures.cash_reserve as f64 / (-net) as f64;
        (1.0 - months_left / 12.0).clamp(0.0, 1.0)
    }

    fn utilization_signal(utilization: f64) -> f64 {
        let (low, high) = UTILIZATION_BAND;
        let distance = if utilization < low {
            low - utilization
        } else if utilization > high {
            utilization - high
        } else {
            0.0
        };
        (distance / 40.0).clamp(0.0, 1.0)
    }
}
