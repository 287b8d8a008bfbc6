//! Domain models for Oracle
//!
//! All monetary amounts are `i64` minor units (cents) in a single currency.
//! Rates stay in `f64` only inside a single projection step and are rounded
//! back to cents immediately.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current-state financial facts, assembled once per request and immutable
/// for the duration of the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub starting_cash: i64,
    pub monthly_retainers: i64,
    pub monthly_recurring_costs: i64,
    pub monthly_payroll: i64,
    // camelCase would yield "outstandingAr"; the API contract capitalizes
    // the acronym
    #[serde(rename = "outstandingAR")]
    pub outstanding_ar: i64,
    #[serde(rename = "outstandingAP")]
    pub outstanding_ap: i64,
    pub pipeline_value: i64,
}

impl FinancialSnapshot {
    /// Total monthly outflow (payroll + recurring costs). Derived, not stored.
    pub fn total_burn(&self) -> i64 {
        self.monthly_payroll + self.monthly_recurring_costs
    }
}

/// Market condition multiplier applied to both growth and churn.
///
/// Fixed policy coefficients (stable across calls):
/// boom dampens churn (x0.7) and amplifies growth (x1.3);
/// recession amplifies churn (x1.5) and dampens growth (x0.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketCondition {
    Boom,
    #[default]
    Stable,
    Recession,
}

impl MarketCondition {
    pub fn churn_factor(&self) -> f64 {
        match self {
            Self::Boom => 0.7,
            Self::Stable => 1.0,
            Self::Recession => 1.5,
        }
    }

    pub fn growth_factor(&self) -> f64 {
        match self {
            Self::Boom => 1.3,
            Self::Stable => 1.0,
            Self::Recession => 0.6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boom => "BOOM",
            Self::Stable => "STABLE",
            Self::Recession => "RECESSION",
        }
    }
}

impl std::str::FromStr for MarketCondition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BOOM" => Ok(Self::Boom),
            "STABLE" => Ok(Self::Stable),
            "RECESSION" => Ok(Self::Recession),
            _ => Err(format!("Unknown market condition: {}", s)),
        }
    }
}

impl std::fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hypothetical set of strategic decisions, supplied by the caller.
///
/// Percentages are in [0,100]; headcount deltas are non-negative (negative
/// values are rejected at deserialization by the unsigned type). The
/// coordinator validates bounds before any projection runs — caller input is
/// never silently clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationScenario {
    /// Seniority tier label -> headcount delta. Tiers must exist in the
    /// registered tier table.
    #[serde(default)]
    pub hiring_plan: BTreeMap<String, u32>,
    /// Expected fraction of recurring revenue lost per month, compounding.
    #[serde(default)]
    pub client_churn_rate: f64,
    /// Expected month-over-month growth applied to pipeline conversion.
    #[serde(default)]
    pub new_client_growth: f64,
    #[serde(default)]
    pub market_condition: MarketCondition,
    #[serde(default = "default_expense_multiplier")]
    pub expense_multiplier: f64,
}

fn default_expense_multiplier() -> f64 {
    1.0
}

impl SimulationScenario {
    /// The no-change scenario. Must project identically to the baseline.
    pub fn neutral() -> Self {
        Self {
            hiring_plan: BTreeMap::new(),
            client_churn_rate: 0.0,
            new_client_growth: 0.0,
            market_condition: MarketCondition::Stable,
            expense_multiplier: 1.0,
        }
    }

}

impl Default for SimulationScenario {
    fn default() -> Self {
        Self::neutral()
    }
}

/// One month of a projected trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFigures {
    pub revenue: i64,
    pub expenses: i64,
    pub cash_reserve: i64,
}

/// One simulated month: the baseline and scenario trajectories side by side,
/// plus signals derived from the scenario trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMonth {
    /// Ordinal month, 1..=12.
    pub month: u32,
    pub baseline: MonthlyFigures,
    pub scenario: MonthlyFigures,
    /// Assignment load vs. available capacity under scenario headcount,
    /// as a percentage. Never negative; may exceed 100.
    pub team_utilization: f64,
    /// Combined risk score, clamped to 0..=100.
    pub risk_score: u8,
}

/// Direction of a staff member's load over the 12-month horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UtilizationTrend {
    Up,
    Down,
    Stable,
}

impl UtilizationTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Stable => "STABLE",
        }
    }
}

impl std::fmt::Display for UtilizationTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-staff sustainability forecast under the scenario's staffing plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceForecast {
    pub user_id: i64,
    pub user_name: String,
    /// 0..=100.
    pub burnout_risk: u8,
    /// First month cumulative overload crosses tolerance; `None` means not
    /// projected within the 12-month horizon.
    pub months_until_burnout: Option<u32>,
    pub utilization_trend: UtilizationTrend,
}

/// Coarse risk bucket derived from the month-12 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket boundaries: <25 LOW, <50 MEDIUM, <75 HIGH, else CRITICAL.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => Self::Low,
            25..=49 => Self::Medium,
            50..=74 => Self::High,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full response payload for one simulate call. Constructed fresh per
/// request and discarded after the response is returned; nothing here is
/// persisted or cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Always exactly 12 entries, ordered month 1..=12.
    pub results: Vec<SimulationMonth>,
    pub resources: Vec<ResourceForecast>,
    pub financial_snapshot: FinancialSnapshot,
    pub risk_level: RiskLevel,
    /// Deterministic month-12 cash comparison line.
    pub prediction: String,
    /// Short templated string naming the dominant risk driver.
    pub recommendation: String,
    /// Snapshot aggregates that could not be read and were zeroed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<String>,
}

/// Format cents as a dollar string for report text ("-$1234.56").
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}
