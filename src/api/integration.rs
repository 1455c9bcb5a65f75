//! Wiring configuration into application state

use super::handlers::RoutingState;
use super::routes::AppState;
use crate::ai::{AiAnalysisClient, AiConfig};
use crate::config::{IntakeConfig, RoutingConfig};
use crate::error::Result;
use crate::grievances::{GrievanceStore, GrievancesState, InMemoryGrievanceStore, IntakeService};
use crate::routing::DepartmentRouter;
use std::sync::Arc;
use tracing::info;

/// Build the router, store, optional AI client and intake service
pub fn init_app_state(
    routing: &RoutingConfig,
    intake: IntakeConfig,
    ai: AiConfig,
) -> Result<AppState> {
    let router = Arc::new(DepartmentRouter::from_config(routing)?);
    let store: Arc<dyn GrievanceStore> = Arc::new(InMemoryGrievanceStore::new());

    build_app_state(router, store, intake, ai)
}

/// Assemble state around an existing router and store
pub fn build_app_state(
    router: Arc<DepartmentRouter>,
    store: Arc<dyn GrievanceStore>,
    intake: IntakeConfig,
    ai: AiConfig,
) -> Result<AppState> {
    let mut service = IntakeService::new(router.clone(), store, intake);

    if ai.enabled {
        let min_override_confidence = ai.min_override_confidence;
        info!(
            "AI analysis enabled: {} (override at confidence >= {:.2})",
            ai.service_url, min_override_confidence
        );
        let client = AiAnalysisClient::new(ai)?;
        service = service.with_ai(Arc::new(client), min_override_confidence);
    } else {
        info!("AI analysis disabled, keyword routing only");
    }

    Ok(AppState {
        routing: RoutingState { router },
        grievances: GrievancesState {
            intake: Arc::new(service),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{DepartmentId, KeywordEntry};

    #[test]
    fn test_init_with_defaults() {
        let state = init_app_state(
            &RoutingConfig::default(),
            IntakeConfig::default(),
            AiConfig::default(),
        )
        .unwrap();
        assert_eq!(
            state.routing.router.default_department(),
            DepartmentId::Municipal
        );
    }

    #[test]
    fn test_init_rejects_bad_dictionary() {
        let routing = RoutingConfig {
            default_department: DepartmentId::Municipal,
            extra_keywords: vec![KeywordEntry::new("", DepartmentId::Police, 1)],
        };
        assert!(init_app_state(&routing, IntakeConfig::default(), AiConfig::default()).is_err());
    }

    #[test]
    fn test_init_with_ai_enabled() {
        let ai = AiConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(init_app_state(&RoutingConfig::default(), IntakeConfig::default(), ai).is_ok());
    }
}
