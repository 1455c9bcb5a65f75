//! HTTP API tests, exercising the full axum router in-process

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use civic_router::ai::AiConfig;
use civic_router::api::{build_router, init_app_state};
use civic_router::config::{IntakeConfig, RoutingConfig, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(server: ServerConfig, ai: AiConfig) -> Router {
    let state = init_app_state(&RoutingConfig::default(), IntakeConfig::default(), ai).unwrap();
    build_router(state, &server)
}

fn app() -> Router {
    app_with(ServerConfig::default(), AiConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn submission() -> Value {
    json!({
        "title": "Water leak near school",
        "description": "Pipe burst on the corner, water everywhere",
        "location": {
            "address": "12 Station Road",
            "coordinates": [77.59, 12.97],
            "city": "Bengaluru",
            "state": "Karnataka"
        }
    })
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_classify_missing_fields_fall_back() {
    let (status, body) = send(&app(), Method::POST, "/api/v1/routing/classify", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department"], "Municipal");
    assert_eq!(body["confidence"], 0.3);
    assert_eq!(body["matched_terms"], json!([]));
}

#[tokio::test]
async fn test_classify_pothole() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/routing/classify",
        Some(json!({
            "title": "Pothole on Main Street",
            "description": "large pothole damaging cars"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department"], "PublicWorks");
    assert!(body["confidence"].as_f64().unwrap() > 0.5);
}

#[tokio::test]
async fn test_analyze_text() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/images/analyze-text",
        Some(json!({"title": "Water leak", "description": "pipe burst"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggested_department"], "Water Supply Department");
    assert_eq!(body["category"], "utilities");
    assert_eq!(body["auto_priority"], "high");
    assert_eq!(body["labels"], json!(["WaterSupply:3"]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/images/analyze-text",
        Some(json!({"title": "", "description": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_departments() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/departments", None).await;

    assert_eq!(status, StatusCode::OK);
    let departments = body["departments"].as_array().unwrap();
    assert_eq!(departments.len(), 7);
    assert_eq!(departments[0]["id"], "PublicWorks");
    assert_eq!(departments[0]["name"], "Public Works Department (PWD)");
    assert_eq!(body["default_department"], "Municipal");
}

#[tokio::test]
async fn test_grievance_lifecycle() {
    let app = app();

    let (status, created) =
        send(&app, Method::POST, "/api/v1/grievances", Some(submission())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["assigned_department"], "WaterSupply");
    assert_eq!(created["assignment_source"], "heuristic");
    assert_eq!(created["status"], "pending");
    assert_eq!(created["category"], "utilities");

    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/grievances/{}", id);

    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "status": "in_progress",
            "assigned_department": "Municipal Corporation"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["assigned_department"], "Municipal");
    assert_eq!(updated["assignment_source"], "manual");

    let (status, list) = send(
        &app,
        Method::GET,
        "/api/v1/grievances?status=in_progress&department=Municipal",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
    assert_eq!(list["grievances"][0]["id"], created["id"]);

    let (status, list) = send(&app, Method::GET, "/api/v1/grievances?status=resolved", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_manual_department_is_respected() {
    let mut body = submission();
    body["department"] = json!("Police Department");

    let (status, created) = send(&app(), Method::POST, "/api/v1/grievances", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["assigned_department"], "Police");
    assert_eq!(created["assignment_source"], "manual");
    assert_eq!(created["suggestion"]["department"], "WaterSupply");
}

#[tokio::test]
async fn test_grievance_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/grievances",
        Some(json!({"title": "Hi", "description": "too short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let missing = format!("/api/v1/grievances/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &missing, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(&app, Method::PUT, &missing, Some(json!({"status": "closed"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(&app, Method::GET, "/api/v1/grievances/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_body_limit() {
    let app = app_with(
        ServerConfig {
            max_body_bytes: 64,
            ..Default::default()
        },
        AiConfig::default(),
    );

    let payload = json!({"title": "x".repeat(200)}).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/routing/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app();
    send(&app, Method::POST, "/api/v1/routing/classify", Some(json!({"title": "road"}))).await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("routing_classifications_total"));
}

#[tokio::test]
async fn test_confident_ai_verdict_overrides_keywords() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-text")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggested_department": "Municipal Corporation", "confidence": 0.92}"#)
        .expect(1)
        .create_async()
        .await;

    let app = app_with(
        ServerConfig::default(),
        AiConfig {
            enabled: true,
            service_url: server.url(),
            ..Default::default()
        },
    );

    let (status, created) =
        send(&app, Method::POST, "/api/v1/grievances", Some(submission())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["assigned_department"], "Municipal");
    assert_eq!(created["assignment_source"], "ai");
    assert_eq!(created["suggestion"]["department"], "WaterSupply");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unavailable_ai_falls_back_to_keywords() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-text")
        .with_status(200)
        .with_body(r#"{"suggested_department": "Ministry of Magic", "confidence": 0.99}"#)
        .expect(1)
        .create_async()
        .await;

    let app = app_with(
        ServerConfig::default(),
        AiConfig {
            enabled: true,
            service_url: server.url(),
            retry_backoff_ms: 1,
            ..Default::default()
        },
    );

    let (status, created) =
        send(&app, Method::POST, "/api/v1/grievances", Some(submission())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["assigned_department"], "WaterSupply");
    assert_eq!(created["assignment_source"], "heuristic");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_classify_null_text_counts_as_empty() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/routing/classify",
        Some(json!({"title": null, "description": "pothole on road", "image_labels": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department"], "PublicWorks");
}

#[tokio::test]
async fn test_extractor_failures_use_error_body() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/grievances",
        Some(json!({"description": "Pipe burst on the corner, water everywhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::GET, "/api/v1/grievances?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/routing/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].is_string());

    let id = format!("/api/v1/grievances/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::PUT, &id, Some(json!({"status": "archived"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_manual_department_without_keywords_gets_its_category() {
    let (status, created) = send(
        &app(),
        Method::POST,
        "/api/v1/grievances",
        Some(json!({
            "title": "Hello there",
            "description": "Nothing specific to report",
            "department": "Police"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["assigned_department"], "Police");
    assert_eq!(created["category"], "safety");
    assert_eq!(created["priority"], "high");
}

#[tokio::test]
async fn test_grievance_stats() {
    let app = app();

    let (status, stats) = send(&app, Method::GET, "/api/v1/grievances/stats/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 0);

    send(&app, Method::POST, "/api/v1/grievances", Some(submission())).await;
    let mut manual = submission();
    manual["department"] = json!("Police");
    send(&app, Method::POST, "/api/v1/grievances", Some(manual)).await;

    let (status, stats) = send(&app, Method::GET, "/api/v1/grievances/stats/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["pending"], 2);
    assert_eq!(stats["by_department"]["WaterSupply"], 1);
    assert_eq!(stats["by_department"]["Police"], 1);
    assert_eq!(stats["by_category"]["utilities"], 1);
    assert_eq!(stats["by_category"]["safety"], 1);
    assert!(stats["avg_resolution_days"].is_null());
}
