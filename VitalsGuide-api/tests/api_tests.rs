use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use vitals_guide_api::api::create_application;
use vitals_guide_api::config::AppConfig;

async fn test_app() -> Router {
    create_application(&AppConfig::for_tests()).await
}

async fn empty_history_app() -> Router {
    let config = AppConfig {
        history_days: 0,
        ..AppConfig::for_tests()
    };
    create_application(&config).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).method("GET").body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["history"]["message"], "24 snapshots stored");
    assert_eq!(body["components"]["device"]["message"], "No device is connected");
}

#[tokio::test]
async fn test_classify_boundaries() {
    let app = test_app().await;

    let (status, body) = post(&app, "/api/v1/vitals/classify", json!({"vital_type": "heart_rate", "value": 100})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "normal");
    assert_eq!(body["unit"], "bpm");

    let (_, body) = post(&app, "/api/v1/vitals/classify", json!({"vital_type": "temperature", "value": 39.1})).await;
    assert_eq!(body["status"], "critical");

    let (_, body) = post(&app, "/api/v1/vitals/classify", json!({"vital_type": "oxygen_level", "value": 94})).await;
    assert_eq!(body["status"], "warning");
}

#[tokio::test]
async fn test_classify_rejects_negative_value() {
    let app = test_app().await;
    let (status, body) = post(&app, "/api/v1/vitals/classify", json!({"vital_type": "heart_rate", "value": -3})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_values_above_physical_ceiling_are_rejected_everywhere() {
    let app = test_app().await;
    let (_, before) = get(&app, "/api/v1/vitals/latest").await;

    let (status, body) = post(&app, "/api/v1/vitals/readings", json!({"vital_type": "oxygen_level", "value": 150.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = post(&app, "/api/v1/vitals/classify", json!({"vital_type": "oxygen_level", "value": 150.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/v1/predictions",
        json!({"heart_rate": 75, "temperature": 36.8, "oxygen_level": 150.0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the live snapshot never saw the rejected reading
    let (_, after) = get(&app, "/api/v1/vitals/latest").await;
    assert_eq!(after["snapshot"], before["snapshot"]);
}

#[tokio::test]
async fn test_reading_merges_into_live_snapshot() {
    let app = test_app().await;
    let (_, before) = get(&app, "/api/v1/vitals/latest").await;

    let (status, body) = post(&app, "/api/v1/vitals/readings", json!({"vital_type": "oxygen_level", "value": 88})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["oxygen_level"]["value"], 88.0);
    assert_eq!(body["snapshot"]["oxygen_level"]["status"], "critical");
    assert_eq!(body["snapshot"]["heart_rate"], before["snapshot"]["heart_rate"]);
    assert_eq!(body["alert"]["level"], "critical");

    let (_, latest) = get(&app, "/api/v1/vitals/latest").await;
    assert_eq!(latest["snapshot"]["oxygen_level"]["value"], 88.0);
}

#[tokio::test]
async fn test_history_pagination() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/v1/vitals/history?limit=10&offset=0&sort=asc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 24);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["next"], "/api/v1/vitals/history?limit=10&offset=10&sort=asc");
    assert!(body.get("previous").is_none());

    let (status, body) = get(&app, &format!("/api/v1/vitals/history?offset={}", usize::MAX)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert!(body.get("next").is_none());

    let (status, body) = get(&app, "/api/v1/vitals/history?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = get(&app, "/api/v1/vitals/history?start_date=not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_record_and_fetch_history_entry() {
    let app = empty_history_app().await;

    let (status, entry) = post(&app, "/api/v1/vitals/history", Value::Null).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = entry["id"].as_str().unwrap().to_string();

    let (status, fetched) = get(&app, &format!("/api/v1/vitals/history/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, entry);

    let (status, _) = get(&app, &format!("/api/v1/vitals/history/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_and_comparison() {
    let app = test_app().await;

    let (status, body) = get(&app, "/api/v1/vitals/report?days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period_days"], 7);
    assert!(body["report"]["reading_count"].as_u64().unwrap() > 0);
    assert!(body["summary"].as_str().unwrap().contains("Recommendations:"));

    let (status, body) = get(&app, "/api/v1/vitals/comparison").await;
    assert_eq!(status, StatusCode::OK);
    for vital in ["heart_rate", "temperature", "oxygen_level"] {
        assert!(body[vital]["trend"].is_string());
    }

    let (status, body) = get(&app, "/api/v1/vitals/daily-averages?vital_type=heart_rate&days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    let (status, _) = get(&app, "/api/v1/vitals/report?days=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_without_history() {
    let app = empty_history_app().await;
    let (status, body) = get(&app, "/api/v1/vitals/report?days=7").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_data");
}

#[tokio::test]
async fn test_prediction_rules() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/api/v1/predictions",
        json!({"heart_rate": 105, "temperature": 38.5, "oxygen_level": 93}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["condition"], "pneumonia");
    assert_eq!(body["prediction"]["confidence"], 0.85);
    assert!(!body["analysis"]["possible_causes"].as_array().unwrap().is_empty());

    let (_, body) = post(
        &app,
        "/api/v1/predictions",
        json!({"heart_rate": 75, "temperature": 36.8, "oxygen_level": 97}),
    )
    .await;
    assert_eq!(body["prediction"]["condition"], "no_clear_condition");
    assert_eq!(body["prediction"]["confidence"], 0.4);

    let (status, _) = post(
        &app,
        "/api/v1/predictions",
        json!({"heart_rate": 75, "temperature": 36.8, "oxygen_level": 140}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prediction_from_live_snapshot_and_condition_detail() {
    let app = test_app().await;

    let (status, body) = get(&app, "/api/v1/predictions/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"]["condition"].is_string());

    let (status, body) = get(&app, "/api/v1/predictions/conditions/hypoxia").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["recommended_tests"].is_array());

    let (status, _) = get(&app, "/api/v1/predictions/conditions/unknown").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_device_lifecycle() {
    let app = test_app().await;

    let (status, devices) = get(&app, "/api/v1/devices").await;
    assert_eq!(status, StatusCode::OK);
    let id = devices[0]["id"].as_str().unwrap().to_string();

    let (status, _) = get(&app, "/api/v1/devices/connected").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/v1/devices/nope/connect", Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, device) = post(&app, &format!("/api/v1/devices/{}/connect", id), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(device["id"], id.as_str());

    let (status, body) = post(&app, &format!("/api/v1/devices/{}/connect", id), Value::Null).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = post(&app, "/api/v1/devices/disconnect", Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // disconnecting twice is harmless
    let (status, _) = post(&app, "/api/v1/devices/disconnect", Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_ecg_waveform_and_openapi() {
    let app = test_app().await;

    let (status, body) = get(&app, "/api/v1/vitals/ecg?length=40").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 40);
    assert_eq!(body[4], 20.0);

    let (status, body) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "VitalsGuide API");
}
