//! Grievance intake: validation, department assignment, and persistence

use super::models::*;
use super::store::GrievanceStore;
use crate::ai::{AiVerdict, AnalysisProvider, AnalysisRequest};
use crate::config::IntakeConfig;
use crate::error::{Result, RouterError};
use crate::metrics::METRICS;
use crate::routing::triage::{category_for, department_category, priority_for};
use crate::routing::DepartmentRouter;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Turns submissions into stored, assigned grievances
pub struct IntakeService {
    router: Arc<DepartmentRouter>,
    store: Arc<dyn GrievanceStore>,
    ai: Option<Arc<dyn AnalysisProvider>>,
    min_override_confidence: f64,
    config: IntakeConfig,
}

impl IntakeService {
    pub fn new(
        router: Arc<DepartmentRouter>,
        store: Arc<dyn GrievanceStore>,
        config: IntakeConfig,
    ) -> Self {
        Self {
            router,
            store,
            ai: None,
            min_override_confidence: 1.0,
            config,
        }
    }

    /// Consult `provider` on submissions without a manual department.
    /// Verdicts below `min_override_confidence` are ignored.
    pub fn with_ai(mut self, provider: Arc<dyn AnalysisProvider>, min_override_confidence: f64) -> Self {
        self.ai = Some(provider);
        self.min_override_confidence = min_override_confidence;
        self
    }

    pub fn router(&self) -> &DepartmentRouter {
        &self.router
    }

    /// Validate, assign and store a new grievance.
    ///
    /// Assignment precedence: the submitter's department, then a confident
    /// AI verdict, then the keyword router.
    pub async fn submit(&self, submission: GrievanceSubmission) -> Result<Grievance> {
        submission.validate()?;

        let suggestion = self.router.classify(
            &submission.title,
            &submission.description,
            &submission.image_labels,
        );
        METRICS.record_classification(&suggestion);

        let (department, source, verdict) = match submission.department {
            Some(department) => (department, AssignmentSource::Manual, None),
            None => match self.ai_verdict(&submission).await {
                Some(verdict) => (verdict.department, AssignmentSource::Ai, Some(verdict)),
                None => (suggestion.department, AssignmentSource::Heuristic, None),
            },
        };

        let category = submission
            .category
            .or_else(|| verdict.as_ref().and_then(|v| v.category))
            .unwrap_or_else(|| match source {
                AssignmentSource::Heuristic => category_for(&suggestion),
                AssignmentSource::Manual | AssignmentSource::Ai => department_category(department),
            });
        let priority = submission
            .priority
            .or_else(|| verdict.as_ref().and_then(|v| v.priority))
            .unwrap_or_else(|| priority_for(category));

        let now = Utc::now();
        let grievance = Grievance {
            id: Uuid::new_v4(),
            title: submission.title.trim().to_string(),
            description: submission.description.trim().to_string(),
            category,
            priority,
            status: GrievanceStatus::Pending,
            location: submission.location,
            image_labels: submission.image_labels,
            assigned_department: department,
            assignment_source: source,
            suggestion,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        };

        let grievance = self.store.insert(grievance).await?;
        METRICS.record_grievance_created(source.as_str());

        info!(
            "Grievance {} assigned to {} ({})",
            grievance.id,
            grievance.assigned_department,
            source.as_str()
        );

        Ok(grievance)
    }

    /// Confident AI verdict, or `None` to fall back to the keyword router
    async fn ai_verdict(&self, submission: &GrievanceSubmission) -> Option<AiVerdict> {
        let provider = self.ai.as_ref().filter(|p| p.is_enabled())?;

        let request = AnalysisRequest {
            title: submission.title.clone(),
            description: submission.description.clone(),
            image_labels: submission.image_labels.clone(),
        };

        match provider.analyze(&request).await {
            Ok(verdict) if verdict.confidence >= self.min_override_confidence => Some(verdict),
            Ok(verdict) => {
                debug!(
                    "AI verdict {} below override threshold ({:.2} < {:.2})",
                    verdict.department, verdict.confidence, self.min_override_confidence
                );
                None
            }
            Err(e) => {
                warn!("AI analysis unavailable, using keyword routing: {}", e);
                None
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Grievance> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RouterError::NotFound(format!("Grievance {} not found", id)))
    }

    /// Newest first; the limit defaults and is capped per intake config
    pub async fn list(&self, filter: GrievanceFilter) -> Result<Vec<Grievance>> {
        let limit = match filter.limit {
            Some(0) => {
                return Err(RouterError::Validation("limit must be at least 1".to_string()))
            }
            Some(limit) => limit.min(self.config.max_list_limit),
            None => self.config.default_list_limit,
        };

        self.store.list(&filter, limit).await
    }

    pub async fn update(&self, id: Uuid, update: GrievanceUpdate) -> Result<Grievance> {
        if update.is_empty() {
            return Err(RouterError::Validation("update has no fields to change".to_string()));
        }

        let reassigned = update.assigned_department;
        let grievance = self.store.update(id, update).await?;

        if let Some(department) = reassigned {
            info!("Grievance {} manually reassigned to {}", id, department);
        }

        Ok(grievance)
    }

    /// Totals by status, category, priority and department
    pub async fn stats(&self) -> Result<GrievanceStats> {
        self.store.stats().await
    }
}
