//! CLI command tests

use oracle_core::{Database, MarketCondition, SimulationScenario};
use tempfile::TempDir;

use crate::commands::{self, build_scenario};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.seed_demo_records().unwrap();
    db
}

// ========== Scenario Assembly Tests ==========

#[test]
fn test_build_scenario_defaults_to_neutral() {
    let scenario = build_scenario(None, None, None, None, None, &[]).unwrap();
    assert_eq!(scenario, SimulationScenario::neutral());
}

#[test]
fn test_build_scenario_flag_overrides() {
    let scenario = build_scenario(
        None,
        Some(15.0),
        Some(25.0),
        Some("boom"),
        Some(1.2),
        &["senior=2".to_string(), "junior=1".to_string()],
    )
    .unwrap();

    assert_eq!(scenario.client_churn_rate, 15.0);
    assert_eq!(scenario.new_client_growth, 25.0);
    assert_eq!(scenario.market_condition, MarketCondition::Boom);
    assert_eq!(scenario.expense_multiplier, 1.2);
    assert_eq!(scenario.hiring_plan.get("senior"), Some(&2));
    assert_eq!(scenario.hiring_plan.get("junior"), Some(&1));
}

#[test]
fn test_build_scenario_repeated_hire_flags_accumulate() {
    let scenario = build_scenario(
        None,
        None,
        None,
        None,
        None,
        &["mid=1".to_string(), "mid=2".to_string()],
    )
    .unwrap();

    assert_eq!(scenario.hiring_plan.get("mid"), Some(&3));
}

#[test]
fn test_build_scenario_from_file_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario.json");
    std::fs::write(
        &path,
        r#"{ "clientChurnRate": 10.0, "marketCondition": "RECESSION" }"#,
    )
    .unwrap();

    let scenario =
        build_scenario(Some(path.as_path()), Some(20.0), None, None, None, &[]).unwrap();

    // File sets the base, the flag wins
    assert_eq!(scenario.client_churn_rate, 20.0);
    assert_eq!(scenario.market_condition, MarketCondition::Recession);
}

#[test]
fn test_build_scenario_rejects_bad_hire_spec() {
    assert!(build_scenario(None, None, None, None, None, &["senior".to_string()]).is_err());
    assert!(build_scenario(None, None, None, None, None, &["=2".to_string()]).is_err());
    assert!(build_scenario(None, None, None, None, None, &["senior=-1".to_string()]).is_err());
}

#[test]
fn test_build_scenario_rejects_bad_market() {
    assert!(build_scenario(None, None, None, Some("sideways"), None, &[]).is_err());
}

// ========== Command Tests ==========

#[test]
fn test_cmd_init_and_seed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("oracle.db");

    assert!(commands::cmd_init(&path).is_ok());
    assert!(commands::cmd_seed(&path).is_ok());
    assert!(commands::cmd_snapshot(&path).is_ok());
}

#[test]
fn test_cmd_simulate_prints_report() {
    let db = setup_test_db();
    let scenario = build_scenario(None, Some(10.0), None, None, None, &[]).unwrap();

    assert!(commands::cmd_simulate(&db, &scenario, false).is_ok());
    assert!(commands::cmd_simulate(&db, &scenario, true).is_ok());
}

#[test]
fn test_cmd_simulate_rejects_invalid_scenario() {
    let db = setup_test_db();
    let scenario = build_scenario(None, Some(150.0), None, None, None, &[]).unwrap();

    assert!(commands::cmd_simulate(&db, &scenario, false).is_err());
}
