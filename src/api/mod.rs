//! HTTP API
//!
//! JSON over axum. Errors use a `{code, message}` body.

pub mod handlers;
pub mod integration;
pub mod models;
pub mod routes;

pub use handlers::RoutingState;
pub use integration::{build_app_state, init_app_state};
pub use models::{error_response, ApiError};
pub use routes::{build_router, AppState};
