//! Grievance persistence

use super::models::{Grievance, GrievanceFilter, GrievanceStats, GrievanceUpdate};
use crate::error::{Result, RouterError};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Storage backend for grievances
#[async_trait]
pub trait GrievanceStore: Send + Sync {
    async fn insert(&self, grievance: Grievance) -> Result<Grievance>;

    async fn get(&self, id: Uuid) -> Result<Option<Grievance>>;

    /// Matching grievances, newest first, at most `limit`
    async fn list(&self, filter: &GrievanceFilter, limit: usize) -> Result<Vec<Grievance>>;

    /// Apply an update and return the new state; `NotFound` for an unknown id
    async fn update(&self, id: Uuid, update: GrievanceUpdate) -> Result<Grievance>;

    async fn stats(&self) -> Result<GrievanceStats>;
}

/// Process-local store backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryGrievanceStore {
    grievances: DashMap<Uuid, Grievance>,
}

impl InMemoryGrievanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.grievances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grievances.is_empty()
    }
}

#[async_trait]
impl GrievanceStore for InMemoryGrievanceStore {
    async fn insert(&self, grievance: Grievance) -> Result<Grievance> {
        match self.grievances.entry(grievance.id) {
            Entry::Occupied(_) => Err(RouterError::Internal(format!(
                "Grievance {} already exists",
                grievance.id
            ))),
            Entry::Vacant(slot) => {
                debug!("Storing grievance: id={}", grievance.id);
                slot.insert(grievance.clone());
                Ok(grievance)
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Grievance>> {
        Ok(self.grievances.get(&id).map(|g| g.value().clone()))
    }

    async fn list(&self, filter: &GrievanceFilter, limit: usize) -> Result<Vec<Grievance>> {
        let mut matching: Vec<Grievance> = self
            .grievances
            .iter()
            .filter(|g| filter.matches(g.value()))
            .map(|g| g.value().clone())
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        matching.truncate(limit);

        Ok(matching)
    }

    async fn update(&self, id: Uuid, update: GrievanceUpdate) -> Result<Grievance> {
        let mut entry = self
            .grievances
            .get_mut(&id)
            .ok_or_else(|| RouterError::NotFound(format!("Grievance {} not found", id)))?;

        update.apply(entry.value_mut());
        debug!("Updated grievance: id={}, status={:?}", id, entry.status);

        Ok(entry.value().clone())
    }

    async fn stats(&self) -> Result<GrievanceStats> {
        let entries: Vec<_> = self.grievances.iter().collect();
        Ok(GrievanceStats::from_grievances(
            entries.iter().map(|entry| entry.value()),
        ))
    }
}
