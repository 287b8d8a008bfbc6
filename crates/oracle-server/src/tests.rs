//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use oracle_core::test_utils::MockOllamaServer;
use oracle_core::{AdvisorClient, Database, MockAdvisor, TierTable, FALLBACK_ADVICE};
use tower::ServiceExt;

fn seeded_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.seed_demo_records().unwrap();
    db
}

fn setup_test_app() -> Router {
    create_router_with_advisor(seeded_db(), TierTable::builtin(), None)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

// ========== Simulate API Tests ==========

#[tokio::test]
async fn test_simulate_neutral_scenario() {
    let app = setup_test_app();

    let body = serde_json::json!({ "scenario": {} });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 12);
    assert_eq!(results[0]["month"], 1);
    assert!(results[0]["baseline"].get("cashReserve").is_some());
    assert!(json.get("riskLevel").is_some());
    assert!(json.get("prediction").is_some());
}

#[tokio::test]
async fn test_simulate_full_scenario_body() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "scenario": {
            "clientChurnRate": 15.0,
            "newClientGrowth": 25.0,
            "hiringPlan": { "senior": 1 },
            "marketCondition": "BOOM",
            "expenseMultiplier": 1.1
        }
    });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 12);
    assert!(!json["resources"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_simulate_invalid_churn_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({ "scenario": { "clientChurnRate": 150.0 } });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("clientChurnRate"));
}

#[tokio::test]
async fn test_simulate_negative_headcount_is_bad_request() {
    let app = setup_test_app();

    // Rejected at deserialization by the unsigned headcount type; still a
    // client error with the contract's error body
    let body = serde_json::json!({ "scenario": { "hiringPlan": { "senior": -1 } } });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_simulate_unknown_tier_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({ "scenario": { "hiringPlan": { "wizard": 2 } } });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("wizard"));
}

#[tokio::test]
async fn test_simulate_on_empty_database_succeeds() {
    let db = Database::in_memory().unwrap();
    let app = create_router_with_advisor(db, TierTable::builtin(), None);

    let body = serde_json::json!({ "scenario": {} });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_simulate_with_unreadable_aggregate_reports_degraded() {
    let db = seeded_db();
    // Break one aggregate read; the forecast must degrade, not fail
    db.conn().unwrap().execute_batch("DROP TABLE accounts").unwrap();
    let app = create_router_with_advisor(db, TierTable::builtin(), None);

    let body = serde_json::json!({ "scenario": {} });
    let response = app.oneshot(post_json("/oracle/simulate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 12);
    let degraded: Vec<&str> = json["degraded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(degraded.contains(&"startingCash"));
    assert_eq!(json["financialSnapshot"]["startingCash"], 0);
}

// ========== Advisor API Tests ==========

#[tokio::test]
async fn test_advisor_without_backend_serves_fallback() {
    let app = setup_test_app();

    let body = serde_json::json!({ "context": "month 12 comparison", "prompt": "advice?" });
    let response = app.oneshot(post_json("/oracle/advisor", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["advice"], FALLBACK_ADVICE);
}

#[tokio::test]
async fn test_advisor_with_mock_backend() {
    let advisor = AdvisorClient::Mock(MockAdvisor::with_reply("Reduce fixed costs first."));
    let app = create_router_with_advisor(seeded_db(), TierTable::builtin(), Some(advisor));

    let body = serde_json::json!({ "context": "ctx", "prompt": "what now?" });
    let response = app.oneshot(post_json("/oracle/advisor", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["advice"], "Reduce fixed costs first.");
}

#[tokio::test]
async fn test_advisor_with_failing_ollama_still_200() {
    let mut server = MockOllamaServer::start_failing().await;
    let advisor = AdvisorClient::ollama(&server.url(), "llama3.2");
    let app = create_router_with_advisor(seeded_db(), TierTable::builtin(), Some(advisor));

    let body = serde_json::json!({ "context": "ctx", "prompt": "prompt" });
    let response = app.oneshot(post_json("/oracle/advisor", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["advice"], FALLBACK_ADVICE);

    server.stop();
}

#[tokio::test]
async fn test_advisor_with_live_mock_ollama() {
    let mut server = MockOllamaServer::start().await;
    let advisor = AdvisorClient::ollama(&server.url(), "llama3.2");
    let app = create_router_with_advisor(seeded_db(), TierTable::builtin(), Some(advisor));

    let body = serde_json::json!({ "context": "ctx", "prompt": "how do we extend runway?" });
    let response = app.oneshot(post_json("/oracle/advisor", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_ne!(json["advice"], FALLBACK_ADVICE);

    server.stop();
}

// ========== Snapshot and Seed API Tests ==========

#[tokio::test]
async fn test_get_snapshot_seeded() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oracle/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["snapshot"]["startingCash"].as_i64().unwrap() > 0);
    assert!(json.get("degraded").is_none());
}

#[tokio::test]
async fn test_seed_then_snapshot() {
    let db = Database::in_memory().unwrap();
    let app = create_router_with_advisor(db, TierTable::builtin(), None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/oracle/seed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oracle/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["snapshot"]["monthlyRetainers"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oracle/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
}
