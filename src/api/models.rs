//! Request and response types for the HTTP API

use crate::error::RouterError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Map a crate error to a status code and error body
pub fn error_response(err: &RouterError) -> (StatusCode, Json<ApiError>) {
    let status = match err {
        RouterError::Validation(_) => StatusCode::BAD_REQUEST,
        RouterError::NotFound(_) => StatusCode::NOT_FOUND,
        RouterError::Decode(_) | RouterError::Upstream(_) | RouterError::CircuitOpen(_) => {
            StatusCode::BAD_GATEWAY
        }
        RouterError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        RouterError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
        RouterError::Configuration(_) | RouterError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    // Server-side failures are logged by the handler; the body stays generic
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    (status, Json(ApiError::new(err.code(), message)))
}

/// Malformed or unreadable JSON bodies become `VALIDATION_ERROR`; an
/// oversized body keeps its 413.
pub fn json_rejection(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ApiError::new("PAYLOAD_TOO_LARGE", rejection.body_text())),
        );
    }
    error_response(&RouterError::Validation(rejection.body_text()))
}

pub fn query_rejection(rejection: QueryRejection) -> (StatusCode, Json<ApiError>) {
    error_response(&RouterError::Validation(rejection.body_text()))
}

/// Explicit `null` reads as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text to classify; missing or null fields count as empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentList {
    pub departments: Vec<DepartmentInfo>,
    pub default_department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
