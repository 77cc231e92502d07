//! Maintenance request service

use crate::{
    error::{AppError, AppResult},
    models::maintenance_request::{
        MaintenanceRequest, MaintenanceRequestInput, MaintenanceRequestPayload,
        MaintenanceRequestRecord,
    },
    repository::Repository,
};

fn not_found() -> AppError {
    AppError::NotFound("Maintenance request not found".to_string())
}

#[derive(Clone)]
pub struct MaintenanceRequestsService {
    repository: Repository,
}

impl MaintenanceRequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceRequest>> {
        self.repository.requests.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRequest> {
        self.repository.requests.get_by_id(id).await?.ok_or_else(not_found)
    }

    /// Create a request; the creator is always the caller
    pub async fn create(
        &self,
        payload: MaintenanceRequestPayload,
        created_by: i32,
    ) -> AppResult<MaintenanceRequest> {
        let record = self.resolve(payload.into_input()?).await?;
        let request = self.repository.requests.create(&record, created_by).await?;
        tracing::info!(
            "Maintenance request {} created by user {} on equipment {}",
            request.id,
            created_by,
            request.equipment_id
        );
        Ok(request)
    }

    pub async fn update(
        &self,
        id: i32,
        payload: MaintenanceRequestPayload,
    ) -> AppResult<MaintenanceRequest> {
        if self.repository.requests.get_by_id(id).await?.is_none() {
            return Err(not_found());
        }

        let record = self.resolve(payload.into_input()?).await?;
        self.repository.requests.update(id, &record).await?.ok_or_else(not_found)
    }

    /// Change only the status. Any status may follow any other.
    pub async fn update_status(
        &self,
        id: i32,
        status: Option<String>,
    ) -> AppResult<MaintenanceRequest> {
        let current = self.repository.requests.get_by_id(id).await?.ok_or_else(not_found)?;

        let status = status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Status is required".to_string()))?;

        let status_id = self.status_id(&status).await?;
        let updated = self
            .repository
            .requests
            .update_status(id, status_id)
            .await?
            .ok_or_else(not_found)?;

        tracing::debug!(
            "Request {} moved from {:?} to {:?}",
            id,
            current.status,
            updated.status
        );
        Ok(updated)
    }

    /// Returns `false` when the request did not exist
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        self.repository.requests.delete(id).await
    }

    async fn status_id(&self, name: &str) -> AppResult<i32> {
        self.repository
            .reference
            .find_status_id(name)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Status '{}' not found", name)))
    }

    /// Resolve the status name and check that every referenced row exists
    async fn resolve(&self, input: MaintenanceRequestInput) -> AppResult<MaintenanceRequestRecord> {
        let status_id = self.status_id(&input.status).await?;

        if !self.repository.equipment.exists(input.equipment_id).await? {
            return Err(AppError::Validation(format!(
                "Equipment {} not found",
                input.equipment_id
            )));
        }

        if !self.repository.reference.team_exists(input.team_id).await? {
            return Err(AppError::Validation(format!(
                "Maintenance team {} not found",
                input.team_id
            )));
        }

        if let Some(assignee) = input.assigned_to {
            if !self.repository.users.exists(assignee).await? {
                return Err(AppError::Validation(format!("User {} not found", assignee)));
            }
        }

        Ok(input.into_record(status_id))
    }
}
