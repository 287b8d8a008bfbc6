//! Scenario assembly and simulation output

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

use oracle_core::models::format_cents;
use oracle_core::{
    Database, SimulationCoordinator, SimulationReport, SimulationScenario, TierTable,
};

/// Build a scenario from an optional JSON file plus flag overrides.
///
/// The base is the file contents when given, the neutral scenario
/// otherwise. Every flag that is set replaces the corresponding field.
pub fn build_scenario(
    file: Option<&Path>,
    churn: Option<f64>,
    growth: Option<f64>,
    market: Option<&str>,
    expense_multiplier: Option<f64>,
    hires: &[String],
) -> Result<SimulationScenario> {
    let mut scenario = match file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid scenario JSON in {}", path.display()))?
        }
        None => SimulationScenario::neutral(),
    };

    if let Some(churn) = churn {
        scenario.client_churn_rate = churn;
    }
    if let Some(growth) = growth {
        scenario.new_client_growth = growth;
    }
    if let Some(market) = market {
        scenario.market_condition = market
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Invalid --market value: {}", e))?;
    }
    if let Some(multiplier) = expense_multiplier {
        scenario.expense_multiplier = multiplier;
    }
    for spec in hires {
        let (tier, count) = parse_hire(spec)?;
        *scenario.hiring_plan.entry(tier).or_insert(0) += count;
    }

    Ok(scenario)
}

/// Parse one `TIER=COUNT` hire flag
fn parse_hire(spec: &str) -> Result<(String, u32)> {
    let Some((tier, count)) = spec.split_once('=') else {
        bail!("Invalid --hire value '{}': expected TIER=COUNT", spec);
    };
    let tier = tier.trim().to_lowercase();
    if tier.is_empty() {
        bail!("Invalid --hire value '{}': empty tier name", spec);
    }
    let count: u32 = count
        .trim()
        .parse()
        .with_context(|| format!("Invalid --hire count in '{}'", spec))?;
    Ok((tier, count))
}

pub fn cmd_simulate(db: &Database, scenario: &SimulationScenario, json: bool) -> Result<()> {
    debug!(
        churn = scenario.client_churn_rate,
        growth = scenario.new_client_growth,
        market = %scenario.market_condition,
        hires = scenario.hiring_plan.len(),
        "Running simulation"
    );

    let tiers = TierTable::from_env().context("Failed to load hiring tier table")?;
    let coordinator = SimulationCoordinator::new(db, &tiers);
    let report = coordinator.simulate(scenario)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!();
    println!("🔮 Simulation ({} months)", report.results.len());
    println!("   ──────────────────────────────────────────────────────────────────────");
    println!(
        "   {:>5} {:>14} {:>14} {:>14} {:>14} {:>6} {:>5}",
        "Month", "Revenue", "Expenses", "Cash", "Baseline", "Util%", "Risk"
    );

    for month in &report.results {
        println!(
            "   {:>5} {:>14} {:>14} {:>14} {:>14} {:>6.1} {:>5}",
            month.month,
            format_cents(month.scenario.revenue),
            format_cents(month.scenario.expenses),
            format_cents(month.scenario.cash_reserve),
            format_cents(month.baseline.cash_reserve),
            month.team_utilization,
            month.risk_score,
        );
    }

    if !report.resources.is_empty() {
        println!();
        println!("👥 Resource Forecast");
        println!("   ──────────────────────────────────────────────────────────────────────");
        for resource in &report.resources {
            let burnout = match resource.months_until_burnout {
                Some(m) => format!("burnout in ~{} month(s)", m),
                None => "no burnout projected".to_string(),
            };
            println!(
                "   {:<24} risk {:>3}  trend {:<7} {}",
                resource.user_name, resource.burnout_risk, resource.utilization_trend, burnout
            );
        }
    }

    println!();
    println!("   Risk level: {}", report.risk_level);
    println!("   {}", report.prediction);
    println!("   {}", report.recommendation);

    if !report.degraded.is_empty() {
        println!();
        println!("   ⚠️  Degraded inputs (zeroed): {}", report.degraded.join(", "));
    }

    println!();
}
