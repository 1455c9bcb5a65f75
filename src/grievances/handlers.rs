//! Grievance API handlers

use super::intake::IntakeService;
use super::models::*;
use crate::api::models::{error_response, json_rejection, query_rejection, ApiError};
use crate::metrics::METRICS;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Application state for grievance handlers
#[derive(Clone)]
pub struct GrievancesState {
    pub intake: Arc<IntakeService>,
}

type HandlerResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[derive(Debug, Serialize, Deserialize)]
pub struct GrievanceList {
    pub grievances: Vec<Grievance>,
    pub count: usize,
}

fn parse_id(raw: &str) -> HandlerResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "VALIDATION_ERROR",
                format!("'{}' is not a valid grievance id", raw),
            )),
        )
    })
}

/// Submit a grievance
///
/// POST /api/v1/grievances
pub async fn create_grievance(
    State(state): State<GrievancesState>,
    payload: Result<Json<GrievanceSubmission>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<Grievance>)> {
    let _timer = METRICS
        .http_request_duration
        .with_label_values(&["create_grievance"])
        .start_timer();

    let Json(submission) = payload.map_err(json_rejection)?;
    info!("Grievance submission: title={}", submission.title);

    match state.intake.submit(submission).await {
        Ok(grievance) => Ok((StatusCode::CREATED, Json(grievance))),
        Err(e) => {
            error!("Grievance submission failed: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Fetch one grievance
///
/// GET /api/v1/grievances/:id
pub async fn get_grievance(
    State(state): State<GrievancesState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<Grievance>> {
    let id = parse_id(&id)?;

    state
        .intake
        .get(id)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

/// List grievances, newest first
///
/// GET /api/v1/grievances?status=&department=&category=&limit=
pub async fn list_grievances(
    State(state): State<GrievancesState>,
    query: Result<Query<GrievanceFilter>, QueryRejection>,
) -> HandlerResult<Json<GrievanceList>> {
    let _timer = METRICS
        .http_request_duration
        .with_label_values(&["list_grievances"])
        .start_timer();

    let Query(filter) = query.map_err(query_rejection)?;

    match state.intake.list(filter).await {
        Ok(grievances) => Ok(Json(GrievanceList {
            count: grievances.len(),
            grievances,
        })),
        Err(e) => {
            error!("Grievance listing failed: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Update status, priority, department or resolution notes
///
/// PUT /api/v1/grievances/:id
pub async fn update_grievance(
    State(state): State<GrievancesState>,
    Path(id): Path<String>,
    payload: Result<Json<GrievanceUpdate>, JsonRejection>,
) -> HandlerResult<Json<Grievance>> {
    let id = parse_id(&id)?;
    let Json(update) = payload.map_err(json_rejection)?;
    info!("Grievance update request: id={}", id);

    state
        .intake
        .update(id, update)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Grievance update failed: {}", e);
            error_response(&e)
        })
}

/// Counts by status, category, priority and department
///
/// GET /api/v1/grievances/stats/overview
pub async fn grievance_stats(
    State(state): State<GrievancesState>,
) -> HandlerResult<Json<GrievanceStats>> {
    state.intake.stats().await.map(Json).map_err(|e| {
        error!("Grievance stats failed: {}", e);
        error_response(&e)
    })
}
