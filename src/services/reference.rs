//! Reference data service

use crate::{
    error::AppResult,
    models::reference::{Department, MaintenanceTeam, RequestStatus, Role, TeamReconciliation},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReferenceService {
    repository: Repository,
}

impl ReferenceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Insert missing lookup rows
    pub async fn seed(&self) -> AppResult<()> {
        self.repository.reference.seed().await
    }

    pub async fn roles(&self) -> AppResult<Vec<Role>> {
        self.repository.reference.list_roles().await
    }

    pub async fn departments(&self) -> AppResult<Vec<Department>> {
        self.repository.reference.list_departments().await
    }

    pub async fn teams(&self) -> AppResult<Vec<MaintenanceTeam>> {
        self.repository.reference.list_teams().await
    }

    pub async fn statuses(&self) -> AppResult<Vec<RequestStatus>> {
        self.repository.reference.list_statuses().await
    }

    /// Collapse maintenance teams onto the canonical set
    pub async fn reconcile_teams(&self) -> AppResult<TeamReconciliation> {
        self.repository.reference.reconcile_teams().await
    }

    /// Database round trip for readiness probes
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
