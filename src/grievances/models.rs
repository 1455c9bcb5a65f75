//! Data models for grievances

use crate::error::{Result, RouterError};
use crate::routing::{DepartmentId, Suggestion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievancePriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceCategory {
    Infrastructure,
    Utilities,
    Transportation,
    Healthcare,
    Education,
    Environment,
    Safety,
    Other,
}

/// Who decided the assigned department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Chosen by the submitter or an administrator
    Manual,
    /// External AI verdict
    Ai,
    /// Keyword router
    Heuristic,
}

impl AssignmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentSource::Manual => "manual",
            AssignmentSource::Ai => "ai",
            AssignmentSource::Heuristic => "heuristic",
        }
    }
}

/// Where the grievance was observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl Location {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(RouterError::Validation("Location address cannot be empty".into()));
        }
        if !(-180.0..=180.0).contains(&self.longitude()) {
            return Err(RouterError::Validation(format!(
                "Longitude {} out of range",
                self.longitude()
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude()) {
            return Err(RouterError::Validation(format!(
                "Latitude {} out of range",
                self.latitude()
            )));
        }
        Ok(())
    }
}

/// Grievance submitted by a citizen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrievanceSubmission {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<GrievanceCategory>,
    #[serde(default)]
    pub priority: Option<GrievancePriority>,
    #[serde(default)]
    pub location: Option<Location>,
    /// Tags produced by image analysis of attached photos
    #[serde(default)]
    pub image_labels: Vec<String>,
    /// Department picked by the submitter, overriding any suggestion
    #[serde(default)]
    pub department: Option<DepartmentId>,
}

impl GrievanceSubmission {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: None,
            priority: None,
            location: None,
            image_labels: Vec::new(),
            department: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_image_labels(mut self, labels: Vec<String>) -> Self {
        self.image_labels = labels;
        self
    }

    pub fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_length("Title", &self.title, TITLE_MIN_CHARS, TITLE_MAX_CHARS)?;
        check_length(
            "Description",
            &self.description,
            DESCRIPTION_MIN_CHARS,
            DESCRIPTION_MAX_CHARS,
        )?;
        if let Some(location) = &self.location {
            location.validate()?;
        }
        Ok(())
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(RouterError::Validation(format!(
            "{} must be between {} and {} characters, got {}",
            field, min, max, len
        )));
    }
    Ok(())
}

/// Stored grievance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grievance {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: GrievanceCategory,
    pub priority: GrievancePriority,
    pub status: GrievanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub image_labels: Vec<String>,
    pub assigned_department: DepartmentId,
    pub assignment_source: AssignmentSource,
    /// Router output at intake time, kept for audit
    pub suggestion: Suggestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by administrators or department heads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrievanceUpdate {
    #[serde(default)]
    pub status: Option<GrievanceStatus>,
    #[serde(default)]
    pub priority: Option<GrievancePriority>,
    #[serde(default)]
    pub assigned_department: Option<DepartmentId>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
}

impl GrievanceUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assigned_department.is_none()
            && self.resolution_notes.is_none()
    }

    /// Apply to a grievance, bumping `updated_at`
    pub fn apply(self, grievance: &mut Grievance) {
        if let Some(status) = self.status {
            grievance.status = status;
        }
        if let Some(priority) = self.priority {
            grievance.priority = priority;
        }
        if let Some(department) = self.assigned_department {
            grievance.assigned_department = department;
            grievance.assignment_source = AssignmentSource::Manual;
        }
        if let Some(notes) = self.resolution_notes {
            grievance.resolution_notes = Some(notes);
        }
        grievance.updated_at = Utc::now();
    }
}

/// Listing criteria
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrievanceFilter {
    #[serde(default)]
    pub status: Option<GrievanceStatus>,
    #[serde(default)]
    pub department: Option<DepartmentId>,
    #[serde(default)]
    pub category: Option<GrievanceCategory>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl GrievanceFilter {
    pub fn matches(&self, grievance: &Grievance) -> bool {
        self.status.map_or(true, |s| grievance.status == s)
            && self
                .department
                .map_or(true, |d| grievance.assigned_department == d)
            && self.category.map_or(true, |c| grievance.category == c)
    }
}

/// Aggregate counts over stored grievances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrievanceStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
    pub closed: usize,
    pub by_category: BTreeMap<GrievanceCategory, usize>,
    pub by_priority: BTreeMap<GrievancePriority, usize>,
    pub by_department: BTreeMap<DepartmentId, usize>,
    /// Mean days from creation to the last update, over resolved grievances
    pub avg_resolution_days: Option<f64>,
}

impl GrievanceStats {
    pub fn from_grievances<'a>(grievances: impl IntoIterator<Item = &'a Grievance>) -> Self {
        let mut stats = Self::default();
        let mut resolution_days = Vec::new();

        for grievance in grievances {
            stats.total += 1;
            match grievance.status {
                GrievanceStatus::Pending => stats.pending += 1,
                GrievanceStatus::InProgress => stats.in_progress += 1,
                GrievanceStatus::Resolved => {
                    stats.resolved += 1;
                    let elapsed = grievance.updated_at - grievance.created_at;
                    resolution_days.push(elapsed.num_seconds() as f64 / 86_400.0);
                }
                GrievanceStatus::Rejected => stats.rejected += 1,
                GrievanceStatus::Closed => stats.closed += 1,
            }
            *stats.by_category.entry(grievance.category).or_default() += 1;
            *stats.by_priority.entry(grievance.priority).or_default() += 1;
            *stats
                .by_department
                .entry(grievance.assigned_department)
                .or_default() += 1;
        }

        if !resolution_days.is_empty() {
            stats.avg_resolution_days =
                Some(resolution_days.iter().sum::<f64>() / resolution_days.len() as f64);
        }
        stats
    }
}
