//! Route assembly

use super::handlers::{self, RoutingState};
use crate::config::ServerConfig;
use crate::grievances::handlers as grievance_handlers;
use crate::grievances::GrievancesState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared state for every route group
#[derive(Clone)]
pub struct AppState {
    pub routing: RoutingState,
    pub grievances: GrievancesState,
}

/// Department routing endpoints
pub fn build_routing_routes(state: RoutingState) -> Router {
    Router::new()
        .route("/api/v1/routing/classify", post(handlers::classify))
        .route("/api/v1/images/analyze-text", post(handlers::analyze_text))
        .route("/api/v1/departments", get(handlers::list_departments))
        .with_state(state)
}

/// Grievance intake endpoints
pub fn build_grievance_routes(state: GrievancesState) -> Router {
    Router::new()
        .route(
            "/api/v1/grievances",
            post(grievance_handlers::create_grievance).get(grievance_handlers::list_grievances),
        )
        .route(
            "/api/v1/grievances/stats/overview",
            get(grievance_handlers::grievance_stats),
        )
        .route(
            "/api/v1/grievances/:id",
            get(grievance_handlers::get_grievance).put(grievance_handlers::update_grievance),
        )
        .with_state(state)
}

/// Full application router with body limit and request tracing
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(build_routing_routes(state.routing))
        .merge(build_grievance_routes(state.grievances))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(server.max_body_bytes)),
        )
}
