//! Error types for the routing service

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced by the router, intake flow and API
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid keyword dictionary or service configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external response did not match its expected schema
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Circuit breaker is open: {0}")]
    CircuitOpen(String),

    #[error("AI analysis is disabled")]
    Disabled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RouterError {
    /// Stable machine-readable code, used by the API layer
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::Configuration(_) => "CONFIGURATION_ERROR",
            RouterError::Decode(_) => "DECODE_ERROR",
            RouterError::Validation(_) => "VALIDATION_ERROR",
            RouterError::NotFound(_) => "NOT_FOUND",
            RouterError::Upstream(_) => "UPSTREAM_ERROR",
            RouterError::Timeout(_) => "TIMEOUT",
            RouterError::CircuitOpen(_) => "UPSTREAM_ERROR",
            RouterError::Disabled => "UPSTREAM_DISABLED",
            RouterError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for RouterError {
    fn from(e: config::ConfigError) -> Self {
        RouterError::Configuration(e.to_string())
    }
}
