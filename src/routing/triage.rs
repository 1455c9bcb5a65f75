//! Category and priority triage derived from a department suggestion

use super::models::{DepartmentId, Suggestion};
use super::router::DepartmentRouter;
use crate::grievances::models::{GrievanceCategory, GrievancePriority};
use serde::{Deserialize, Serialize};

/// Text analysis result, shaped like the backend's analyze-text response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub category: GrievanceCategory,
    pub confidence: f64,
    /// Display name of the suggested department
    pub suggested_department: String,
    pub department: DepartmentId,
    pub auto_priority: GrievancePriority,
    /// `"<department>:<score>"` for every department that scored
    pub labels: Vec<String>,
    pub matched_terms: Vec<String>,
}

/// Category implied by a suggestion. The no-signal fallback is `Other`.
pub fn category_for(suggestion: &Suggestion) -> GrievanceCategory {
    if suggestion.matched_terms.is_empty() {
        return GrievanceCategory::Other;
    }
    department_category(suggestion.department)
}

/// Category handled by a department, regardless of keyword evidence
pub fn department_category(department: DepartmentId) -> GrievanceCategory {
    match department {
        DepartmentId::PublicWorks => GrievanceCategory::Infrastructure,
        DepartmentId::Electricity | DepartmentId::WaterSupply => GrievanceCategory::Utilities,
        DepartmentId::Transport => GrievanceCategory::Transportation,
        DepartmentId::Police => GrievanceCategory::Safety,
        DepartmentId::Municipal | DepartmentId::Environment => GrievanceCategory::Environment,
    }
}

pub fn priority_for(category: GrievanceCategory) -> GrievancePriority {
    match category {
        GrievanceCategory::Safety | GrievanceCategory::Utilities => GrievancePriority::High,
        GrievanceCategory::Infrastructure
        | GrievanceCategory::Transportation
        | GrievanceCategory::Healthcare
        | GrievanceCategory::Education => GrievancePriority::Medium,
        GrievanceCategory::Environment | GrievanceCategory::Other => GrievancePriority::Low,
    }
}

/// Classify and triage grievance text in one pass
pub fn analyze_text(
    router: &DepartmentRouter,
    title: &str,
    description: &str,
    image_labels: &[String],
) -> TextAnalysis {
    let board = router.score(title, description, image_labels);
    let labels = board
        .iter()
        .filter(|(_, score)| *score > 0)
        .map(|(dept, score)| format!("{}:{}", dept, score))
        .collect();

    let suggestion = router.select(board);
    let category = category_for(&suggestion);

    TextAnalysis {
        category,
        confidence: suggestion.confidence,
        suggested_department: suggestion.department.display_name().to_string(),
        department: suggestion.department,
        auto_priority: priority_for(category),
        labels,
        matched_terms: suggestion.matched_terms,
    }
}
