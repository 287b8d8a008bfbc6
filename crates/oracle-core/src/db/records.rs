//! Business-record reads and the seeding write surface
//!
//! The aggregate reads here are what the snapshot builder consumes. Each one
//! is a single SUM query so a simulate call sees one coherent value per
//! aggregate rather than a figure that changes mid-computation.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::Result;

/// A staff member from the platform's user records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    /// Seniority tier label, matched against the registered tier table
    pub tier: String,
    pub monthly_cost_cents: i64,
}

/// Ledger entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Receivable,
    Payable,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receivable => "receivable",
            Self::Payable => "payable",
        }
    }
}

/// A staff member together with their currently assigned open work
#[derive(Debug, Clone)]
pub struct StaffWorkload {
    pub user_id: i64,
    pub user_name: String,
    pub tier: String,
    /// Sum of estimated hours across open assigned tasks
    pub assigned_hours: f64,
}

impl Database {
    // ---- Aggregate reads (snapshot builder) ----

    /// Cash on hand: sum of all account balances
    pub fn cash_on_hand(&self) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(balance_cents), 0) FROM accounts",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Guaranteed monthly retainer income across active clients
    pub fn total_monthly_retainers(&self) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(monthly_retainer_cents), 0) FROM clients WHERE status = 'active'",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Current monthly payroll across all staff
    pub fn total_monthly_payroll(&self) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(monthly_cost_cents), 0) FROM staff",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Recurring non-payroll monthly costs
    pub fn total_recurring_costs(&self) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(monthly_cents), 0) FROM recurring_costs",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Estimated value of open pipeline leads (won/lost excluded)
    pub fn total_pipeline_value(&self) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(estimated_value_cents), 0) FROM leads
             WHERE stage NOT IN ('won', 'lost')",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Outstanding (unsettled) ledger total for one direction
    pub fn outstanding_total(&self, kind: LedgerKind) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM ledger_entries
             WHERE kind = ? AND settled = 0",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ---- Record reads (resource forecaster) ----

    /// List all staff members
    pub fn list_staff(&self) -> Result<Vec<StaffMember>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, tier, monthly_cost_cents FROM staff ORDER BY name")?;

        let staff = stmt
            .query_map([], |row| {
                Ok(StaffMember {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    tier: row.get(2)?,
                    monthly_cost_cents: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(staff)
    }

    /// Staff members with their open assigned hours. Staff with no open
    /// tasks are excluded; they carry no forecastable workload.
    pub fn staff_workloads(&self) -> Result<Vec<StaffWorkload>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.tier, SUM(t.estimated_hours)
             FROM staff s
             JOIN tasks t ON t.assignee_id = s.id AND t.status = 'open'
             GROUP BY s.id, s.name, s.tier
             HAVING SUM(t.estimated_hours) > 0
             ORDER BY s.name",
        )?;

        let workloads = stmt
            .query_map([], |row| {
                Ok(StaffWorkload {
                    user_id: row.get(0)?,
                    user_name: row.get(1)?,
                    tier: row.get(2)?,
                    assigned_hours: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(workloads)
    }

    // ---- Write surface (seeding and tests only) ----

    pub fn add_account(&self, name: &str, balance_cents: i64) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (name, balance_cents) VALUES (?, ?)
             ON CONFLICT(name) DO UPDATE SET balance_cents = excluded.balance_cents",
            params![name, balance_cents],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_staff(&self, name: &str, tier: &str, monthly_cost_cents: i64) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO staff (name, tier, monthly_cost_cents) VALUES (?, ?, ?)",
            params![name, tier, monthly_cost_cents],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_client(&self, name: &str, monthly_retainer_cents: i64, status: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO clients (name, monthly_retainer_cents, status) VALUES (?, ?, ?)",
            params![name, monthly_retainer_cents, status],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_project(&self, client_id: i64, name: &str, status: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO projects (client_id, name, status) VALUES (?, ?, ?)",
            params![client_id, name, status],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_task(
        &self,
        project_id: i64,
        assignee_id: i64,
        title: &str,
        status: &str,
        estimated_hours: f64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tasks (project_id, assignee_id, title, status, estimated_hours)
             VALUES (?, ?, ?, ?, ?)",
            params![project_id, assignee_id, title, status, estimated_hours],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_lead(&self, name: &str, estimated_value_cents: i64, stage: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO leads (name, estimated_value_cents, stage) VALUES (?, ?, ?)",
            params![name, estimated_value_cents, stage],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_recurring_cost(&self, name: &str, monthly_cents: i64) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO recurring_costs (name, monthly_cents) VALUES (?, ?)",
            params![name, monthly_cents],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_ledger_entry(
        &self,
        kind: LedgerKind,
        counterparty: &str,
        amount_cents: i64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO ledger_entries (kind, counterparty, amount_cents) VALUES (?, ?, ?)",
            params![kind.as_str(), counterparty, amount_cents],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Seed a small demo agency: one account, four staff, three clients,
    /// projects with open tasks, two leads, recurring costs, and open AR/AP.
    pub fn seed_demo_records(&self) -> Result<()> {
        self.add_account("Operating", 25_000_000)?; // $250k

        let ava = self.add_staff("Ava Torres", "senior", 1_200_000)?;
        let ben = self.add_staff("Ben Okafor", "mid", 850_000)?;
        let cleo = self.add_staff("Cleo Zhang", "junior", 600_000)?;
        let dan = self.add_staff("Dan Ivanov", "lead", 1_500_000)?;

        let northwind = self.add_client("Northwind Media", 2_500_000, "active")?;
        let summit = self.add_client("Summit Retail", 1_800_000, "active")?;
        self.add_client("Former Co", 900_000, "churned")?;

        let site = self.add_project(northwind, "Site Relaunch", "active")?;
        let campaign = self.add_project(summit, "Q4 Campaign", "active")?;

        self.add_task(site, ava, "Design system", "open", 120.0)?;
        self.add_task(site, cleo, "Component build-out", "open", 90.0)?;
        self.add_task(campaign, ben, "Media plan", "open", 140.0)?;
        self.add_task(campaign, dan, "Creative direction", "open", 60.0)?;
        self.add_task(campaign, ben, "Launch retro", "done", 40.0)?;

        self.add_lead("Harbor Logistics", 3_600_000, "proposal")?;
        self.add_lead("Citywide Health", 2_400_000, "qualified")?;

        self.add_recurring_cost("Office lease", 700_000)?;
        self.add_recurring_cost("SaaS tooling", 250_000)?;

        self.add_ledger_entry(LedgerKind::Receivable, "Northwind Media", 2_500_000)?;
        self.add_ledger_entry(LedgerKind::Payable, "Print vendor", 400_000)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retainers_exclude_churned_clients() {
        let db = Database::in_memory().unwrap();
        db.add_client("Active", 100_000, "active").unwrap();
        db.add_client("Gone", 50_000, "churned").unwrap();

        assert_eq!(db.total_monthly_retainers().unwrap(), 100_000);
    }

    #[test]
    fn test_pipeline_excludes_closed_leads() {
        let db = Database::in_memory().unwrap();
        db.add_lead("Open", 100, "qualified").unwrap();
        db.add_lead("Won", 200, "won").unwrap();
        db.add_lead("Lost", 300, "lost").unwrap();

        assert_eq!(db.total_pipeline_value().unwrap(), 100);
    }

    #[test]
    fn test_outstanding_totals_by_kind() {
        let db = Database::in_memory().unwrap();
        db.add_ledger_entry(LedgerKind::Receivable, "A", 500).unwrap();
        db.add_ledger_entry(LedgerKind::Receivable, "B", 700).unwrap();
        db.add_ledger_entry(LedgerKind::Payable, "C", 300).unwrap();

        assert_eq!(db.outstanding_total(LedgerKind::Receivable).unwrap(), 1200);
        assert_eq!(db.outstanding_total(LedgerKind::Payable).unwrap(), 300);
    }

    #[test]
    fn test_staff_workloads_only_open_tasks() {
        let db = Database::in_memory().unwrap();
        let staff = db.add_staff("Worker", "mid", 800_000).unwrap();
        let idle = db.add_staff("Idle", "mid", 800_000).unwrap();
        let client = db.add_client("C", 100_000, "active").unwrap();
        let project = db.add_project(client, "P", "active").unwrap();
        db.add_task(project, staff, "Open work", "open", 80.0).unwrap();
        db.add_task(project, staff, "Done work", "done", 40.0).unwrap();
        let _ = idle;

        let workloads = db.staff_workloads().unwrap();
        assert_eq!(workloads.len(), 1);
        assert_eq!(workloads[0].user_name, "Worker");
        assert!((workloads[0].assigned_hours - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_demo_records() {
        let db = Database::in_memory().unwrap();
        db.seed_demo_records().unwrap();

        assert_eq!(db.total_monthly_retainers().unwrap(), 4_300_000);
        assert_eq!(db.total_monthly_payroll().unwrap(), 4_150_000);
        assert_eq!(db.total_recurring_costs().unwrap(), 950_000);
        assert_eq!(db.total_pipeline_value().unwrap(), 6_000_000);
        assert_eq!(db.cash_on_hand().unwrap(), 25_000_000);
        assert_eq!(db.staff_workloads().unwrap().len(), 4);
    }
}
