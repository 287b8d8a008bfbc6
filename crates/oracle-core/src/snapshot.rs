//! Financial snapshot assembly
//!
//! Assembles the current-state facts the projectors start from. Pure read,
//! no computation beyond summation. A snapshot aggregate that cannot be read
//! is substituted with zero and flagged, so a partial forecast is still
//! produced — forecasting with partial data beats refusing to forecast.

use tracing::warn;

use crate::db::{Database, LedgerKind};
use crate::error::Result;
use crate::models::FinancialSnapshot;

/// Builds a `FinancialSnapshot` from the business-record store.
pub struct SnapshotBuilder<'a> {
    db: &'a Database,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Assemble the snapshot. Returns the snapshot plus the names of any
    /// aggregates that were unavailable and zeroed.
    pub fn build(&self) -> (FinancialSnapshot, Vec<String>) {
        let mut degraded = Vec::new();

        let snapshot = FinancialSnapshot {
            starting_cash: self.aggregate("startingCash", &mut degraded, || {
                self.db.cash_on_hand()
            }),
            monthly_retainers: self.aggregate("monthlyRetainers", &mut degraded, || {
                self.db.total_monthly_retainers()
            }),
            monthly_recurring_costs: self.aggregate("monthlyRecurringCosts", &mut degraded, || {
                self.db.total_recurring_costs()
            }),
            monthly_payroll: self.aggregate("monthlyPayroll", &mut degraded, || {
                self.db.total_monthly_payroll()
            }),
            outstanding_ar: self.aggregate("outstandingAR", &mut degraded, || {
                self.db.outstanding_total(LedgerKind::Receivable)
            }),
            outstanding_ap: self.aggregate("outstandingAP", &mut degraded, || {
                self.db.outstanding_total(LedgerKind::Payable)
            }),
            pipeline_value: self.aggregate("pipelineValue", &mut degraded, || {
                self.db.total_pipeline_value()
            }),
        };

        (snapshot, degraded)
    }

    fn aggregate(
        &self,
        name: &str,
        degraded: &mut Vec<String>,
        read: impl FnOnce() -> Result<i64>,
    ) -> i64 {
        match read() {
            Ok(value) => value,
            Err(e) => {
                warn!(aggregate = name, error = %e, "Snapshot aggregate unavailable, using zero");
                degraded.push(name.to_string());
                0
            }
        }
    }
}
