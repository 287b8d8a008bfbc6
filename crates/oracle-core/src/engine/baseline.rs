//! Baseline projection
//!
//! Advances the snapshot forward 12 months using only currently-known facts:
//! flat retainer revenue, flat burn, no hypothetical changes. AR/AP
//! collection timing and pipeline conversion are intentionally ignored —
//! this is "if nothing changes", not a full cash-timing simulation. The
//! result is a pure function of the snapshot: two calls with the same
//! snapshot produce identical trajectories regardless of any scenario.

use crate::models::{FinancialSnapshot, MonthlyFigures};

use super::HORIZON_MONTHS;

pub struct BaselineProjector;

impl BaselineProjector {
    /// Project the reference trajectory. Deterministic, no randomness.
    pub fn project(snapshot: &FinancialSnapshot) -> Vec<MonthlyFigures> {
        let revenue = snapshot.monthly_retainers;
        let expenses = snapshot.total_burn();

        let mut months = Vec::with_capacity(HORIZON_MONTHS);
        let mut cash = snapshot.starting_cash;

        for _ in 0..HORIZON_MONTHS {
            cash += revenue - expenses;
            months.push(MonthlyFigures {
                revenue,
                expenses,
                cash_reserve: cash,
            });
        }

        months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            starting_cash: 100_000,
            monthly_retainers: 20_000,
            monthly_recurring_costs: 15_000,
            monthly_payroll: 10_000,
            outstanding_ar: 0,
            outstanding_ap: 0,
            pipeline_value: 0,
        }
    }

    #[test]
    fn test_twelve_months_flat() {
        let months = BaselineProjector::project(&snapshot());
        assert_eq!(months.len(), 12);

        for m in &months {
            assert_eq!(m.revenue, 20_000);
            assert_eq!(m.expenses, 25_000);
        }
    }

    #[test]
    fn test_cash_recurrence() {
        let s = snapshot();
        let months = BaselineProjector::project(&s);

        assert_eq!(months[0].cash_reserve, 95_000);
        let mut prev = s.starting_cash;
        for m in &months {
            assert_eq!(m.cash_reserve, prev + m.revenue - m.expenses);
            prev = m.cash_reserve;
        }
        // Net -5000/month over 12 months
        assert_eq!(months[11].cash_reserve, 40_000);
    }

    #[test]
    fn test_projection_continues_past_zero_cash() {
        let s = FinancialSnapshot {
            starting_cash: 10_000,
            ..snapshot()
        };
        let months = BaselineProjector::project(&s);
        assert_eq!(months.len(), 12);
        assert!(months[11].cash_reserve < 0);
    }
}
