mod common;

use axum::http::{header, StatusCode};
use classroom_ai_service::services::providers::mock::MockVisionProvider;
use common::{app_with, demo_app, post_json};
use serde_json::{json, Value};
use std::sync::Arc;

fn session() -> Value {
    json!({
        "duration": 45,
        "totalStudents": 25,
        "date": "2024-02-12",
        "students": [
            { "name": "Sarah Johnson", "activities": ["Coding Python", "Coding Python"], "engagementScore": 80 },
            { "name": "Mike Chen", "activities": ["Reading Documentation"], "engagementScore": 90 },
            { "name": "Alex Brown", "activities": ["Watching YouTube", "Coding Python"], "engagementScore": 70 }
        ]
    })
}

#[tokio::test]
async fn demo_report_with_fixed_engagement() {
    let response = post_json(&demo_app(), "/generate-summary", session()).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["report"]
        .as_str()
        .unwrap()
        .contains("This is a demo report"));
    assert_eq!(response.body["stats"]["avgEngagement"], 75.0);
    assert_eq!(response.body["stats"]["totalStudents"], 25);
    assert_eq!(response.body["stats"]["duration"], 45);
}

#[tokio::test]
async fn stats_come_from_the_roster() {
    let provider = Arc::new(MockVisionProvider::replying("## 📊 Overall Performance\nSolid."));
    let app = app_with(provider.clone());

    let response = post_json(&app, "/generate-summary", session()).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["report"], "## 📊 Overall Performance\nSolid.");
    assert_eq!(response.body["stats"]["avgEngagement"], 80.0);
    assert_eq!(response.body["stats"]["totalStudents"], 3);
    assert_eq!(response.body["stats"]["duration"], 45);

    let prompt = provider.last_prompt().unwrap();
    assert!(prompt.contains("Student: Alex Brown"));
    assert!(prompt.contains("- Date: 2024-02-12"));
}

#[tokio::test]
async fn empty_roster_averages_zero() {
    let app = app_with(Arc::new(MockVisionProvider::replying("Report")));

    let response = post_json(&app, "/api/generate-summary", json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["stats"]["avgEngagement"], 0.0);
    assert_eq!(response.body["stats"]["totalStudents"], 0);
    assert_eq!(response.body["stats"]["duration"], 0);
}

#[tokio::test]
async fn provider_failure_is_plain_error() {
    let app = app_with(Arc::new(MockVisionProvider::failing("backend unavailable")));

    let response = post_json(&app, "/generate-summary", session()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("backend unavailable"));
}

#[tokio::test]
async fn sixteenth_summary_is_throttled() {
    let provider = Arc::new(MockVisionProvider::replying("Report"));
    let app = app_with(provider.clone());

    for _ in 0..15 {
        let response = post_json(&app, "/generate-summary", session()).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = post_json(&app, "/generate-summary", session()).await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body, json!({ "error": "Too many requests" }));
    assert!(response.headers.contains_key(header::RETRY_AFTER));
    assert_eq!(provider.calls(), 15);
}
