//! Routing, department and service endpoints

use super::models::*;
use crate::metrics::METRICS;
use crate::routing::{analyze_text as triage_text, DepartmentId, DepartmentRouter, Suggestion, TextAnalysis};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Application state for routing handlers
#[derive(Clone)]
pub struct RoutingState {
    pub router: Arc<DepartmentRouter>,
}

/// Suggest a department for grievance text
///
/// POST /api/v1/routing/classify
pub async fn classify(
    State(state): State<RoutingState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<Suggestion>, (StatusCode, Json<ApiError>)> {
    let _timer = METRICS
        .http_request_duration
        .with_label_values(&["classify"])
        .start_timer();

    let Json(request) = payload.map_err(json_rejection)?;
    let suggestion = state.router.classify(
        &request.title,
        &request.description,
        &request.image_labels,
    );
    METRICS.record_classification(&suggestion);
    debug!("Classify request resolved to {}", suggestion.department);

    Ok(Json(suggestion))
}

/// Category, priority and department for grievance text
///
/// POST /api/v1/images/analyze-text
pub async fn analyze_text(
    State(state): State<RoutingState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<TextAnalysis>, (StatusCode, Json<ApiError>)> {
    let _timer = METRICS
        .http_request_duration
        .with_label_values(&["analyze_text"])
        .start_timer();

    let Json(request) = payload.map_err(json_rejection)?;

    if request.title.trim().is_empty() && request.description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "VALIDATION_ERROR",
                "Title or description is required",
            )),
        ));
    }

    let analysis = triage_text(&state.router, &request.title, &request.description, &[]);
    info!(
        "Text analysis: department={}, category={:?}",
        analysis.department, analysis.category
    );

    Ok(Json(analysis))
}

/// GET /api/v1/departments
pub async fn list_departments(State(state): State<RoutingState>) -> Json<DepartmentList> {
    let departments = DepartmentId::ALL
        .iter()
        .map(|d| DepartmentInfo {
            id: d.as_str().to_string(),
            name: d.display_name().to_string(),
        })
        .collect();

    Json(DepartmentList {
        departments,
        default_department: state.router.default_department().as_str().to_string(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
