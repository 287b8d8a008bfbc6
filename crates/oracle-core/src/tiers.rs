//! Hiring tier table
//!
//! The scenario's hiring plan is a free-form string-keyed mapping, but cost
//! and capacity assumptions only exist for registered tiers. The coordinator
//! validates incoming tier keys against this table and rejects unknown ones,
//! so a typoed tier is a visible `InvalidScenario` rather than a silently
//! ignored line item.
//!
//! ## Configuration Resolution
//!
//! 1. `ORACLE_TIERS` environment variable pointing at a TOML override file
//! 2. Built-in defaults (compiled into binary)
//!
//! Override file format:
//!
//! ```toml
//! [tiers.senior]
//! monthly_cost_cents = 1_250_000
//! capacity_hours = 150.0
//! ```

use std::collections::BTreeMap;
use std::fs;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable naming the tier table override file
pub const TIERS_ENV: &str = "ORACLE_TIERS";

/// Monthly capacity assumed when a staff record carries a tier label that is
/// not in the table. Existing staff are forecast regardless; only the
/// hiring plan is validated strictly.
pub const DEFAULT_CAPACITY_HOURS: f64 = 160.0;

/// Cost and capacity assumptions for one seniority tier
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TierProfile {
    /// Fully-loaded monthly cost of one hire, in cents
    pub monthly_cost_cents: i64,
    /// Productive hours per person per month
    pub capacity_hours: f64,
}

#[derive(Debug, Deserialize)]
struct TierFile {
    tiers: BTreeMap<String, TierProfile>,
}

/// Registered hiring tiers
#[derive(Debug, Clone)]
pub struct TierTable {
    tiers: BTreeMap<String, TierProfile>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TierTable {
    /// Built-in tier assumptions
    pub fn builtin() -> Self {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            "junior".to_string(),
            TierProfile {
                monthly_cost_cents: 600_000,
                capacity_hours: 160.0,
            },
        );
        tiers.insert(
            "mid".to_string(),
            TierProfile {
                monthly_cost_cents: 850_000,
                capacity_hours: 160.0,
            },
        );
        tiers.insert(
            "senior".to_string(),
            TierProfile {
                monthly_cost_cents: 1_200_000,
                capacity_hours: 150.0,
            },
        );
        tiers.insert(
            "lead".to_string(),
            TierProfile {
                monthly_cost_cents: 1_500_000,
                capacity_hours: 130.0,
            },
        );
        tiers.insert(
            "principal".to_string(),
            TierProfile {
                monthly_cost_cents: 1_800_000,
                capacity_hours: 120.0,
            },
        );
        Self { tiers }
    }

    /// Load from the `ORACLE_TIERS` override if set, else built-ins
    pub fn from_env() -> Result<Self> {
        match std::env::var(TIERS_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(Self::builtin()),
        }
    }

    /// Load a tier table from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read tier table {}: {}", path, e)))?;
        Self::from_toml(&contents)
    }

    /// Parse a tier table from TOML contents
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: TierFile = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse tier table: {}", e)))?;
        if file.tiers.is_empty() {
            return Err(Error::Config("Tier table defines no tiers".to_string()));
        }
        Ok(Self { tiers: file.tiers })
    }

    /// Look up a registered tier
    pub fn get(&self, tier: &str) -> Option<&TierProfile> {
        self.tiers.get(tier)
    }

    /// Whether a tier label is registered
    pub fn contains(&self, tier: &str) -> bool {
        self.tiers.contains_key(tier)
    }

    /// Registered tier labels
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    /// Capacity hours for a tier, defaulting for unregistered labels on
    /// existing staff records
    pub fn capacity_hours(&self, tier: &str) -> f64 {
        self.get(tier)
            .map(|profile| profile.capacity_hours)
            .unwrap_or(DEFAULT_CAPACITY_HOURS)
    }

    /// Total monthly cost of a hiring plan, in cents
    ///
    /// Callers must have validated the plan; unregistered tiers contribute
    /// nothing here.
    pub fn plan_monthly_cost(&self, plan: &BTreeMap<String, u32>) -> i64 {
        plan.iter()
            .filter_map(|(tier, count)| {
                self.get(tier)
                    .map(|profile| profile.monthly_cost_cents * i64::from(*count))
            })
            .sum()
    }

    /// Total monthly capacity hours added by a hiring plan
    pub fn plan_capacity_hours(&self, plan: &BTreeMap<String, u32>) -> f64 {
        plan.iter()
            .filter_map(|(tier, count)| {
                self.get(tier)
                    .map(|profile| profile.capacity_hours * f64::from(*count))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tiers() {
        let table = TierTable::builtin();
        assert!(table.contains("junior"));
        assert!(table.contains("principal"));
        assert!(!table.contains("intern"));
        assert_eq!(table.get("senior").unwrap().monthly_cost_cents, 1_200_000);
    }

    #[test]
    fn test_plan_cost_and_capacity() {
        let table = TierTable::builtin();
        let mut plan = BTreeMap::new();
        plan.insert("junior".to_string(), 2);
        plan.insert("senior".to_string(), 1);

        assert_eq!(table.plan_monthly_cost(&plan), 2 * 600_000 + 1_200_000);
        assert!((table.plan_capacity_hours(&plan) - (2.0 * 160.0 + 150.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toml_override() {
        let table = TierTable::from_toml(
            r#"
            [tiers.apprentice]
            monthly_cost_cents = 400000
            capacity_hours = 170.0
            "#,
        )
        .unwrap();

        assert!(table.contains("apprentice"));
        assert!(!table.contains("junior"));
        assert_eq!(table.get("apprentice").unwrap().monthly_cost_cents, 400_000);
    }

    #[test]
    fn test_empty_toml_rejected() {
        assert!(TierTable::from_toml("[tiers]").is_err());
    }

    #[test]
    fn test_unknown_tier_capacity_defaults() {
        let table = TierTable::builtin();
        assert!((table.capacity_hours("mystery") - DEFAULT_CAPACITY_HOURS).abs() < f64::EPSILON);
    }
}
