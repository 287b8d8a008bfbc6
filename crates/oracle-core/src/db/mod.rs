//! Business-record store with connection pooling and migrations
//!
//! Oracle consumes the surrounding platform's records read-only: staffing,
//! clients, projects, tasks, leads, recurring costs, and the AR/AP ledger.
//! This module is the local stand-in for those collaborators — the snapshot
//! builder aggregates over it, and nothing in the simulation path writes to
//! it. Simulation runs themselves are never persisted.
//!
//! Organized by domain:
//! - `records` - staffing, client, project, task, lead, cost, and ledger reads
//!   plus the write surface used by seeding and tests

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod records;

pub use records::{LedgerKind, StaffMember, StaffWorkload};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create an in-memory database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/oracle_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run schema migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                balance_cents INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS staff (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                tier TEXT NOT NULL,
                monthly_cost_cents INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                monthly_retainer_cents INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'active',
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY,
                client_id INTEGER REFERENCES clients(id),
                name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active'
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                project_id INTEGER REFERENCES projects(id),
                assignee_id INTEGER REFERENCES staff(id),
                title TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'open',
                estimated_hours REAL NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS leads (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                estimated_value_cents INTEGER NOT NULL DEFAULT 0,
                stage TEXT NOT NULL DEFAULT 'new'
            );

            CREATE TABLE IF NOT EXISTS recurring_costs (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                monthly_cents INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ledger_entries (
                id INTEGER PRIMARY KEY,
                kind TEXT NOT NULL CHECK (kind IN ('receivable', 'payable')),
                counterparty TEXT NOT NULL,
                amount_cents INTEGER NOT NULL,
                settled INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(assignee_id, status);
            CREATE INDEX IF NOT EXISTS idx_ledger_open ON ledger_entries(kind, settled);
            ",
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}
