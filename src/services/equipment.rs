//! Equipment service

use crate::{
    error::{AppError, AppResult},
    models::equipment::{AssigneeRef, Equipment, EquipmentInput, EquipmentPayload, EquipmentRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository
            .equipment
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))
    }

    pub async fn create(&self, payload: EquipmentPayload) -> AppResult<Equipment> {
        let record = self.resolve(payload.into_input()?).await?;
        let equipment = self.repository.equipment.create(&record).await?;
        tracing::info!("Equipment {} created (serial {})", equipment.id, equipment.serial_number);
        Ok(equipment)
    }

    pub async fn update(&self, id: i32, payload: EquipmentPayload) -> AppResult<Equipment> {
        if !self.repository.equipment.exists(id).await? {
            return Err(AppError::NotFound("Equipment not found".to_string()));
        }

        let record = self.resolve(payload.into_input()?).await?;
        self.repository
            .equipment
            .update(id, &record)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))
    }

    /// Returns `false` when the equipment did not exist
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        self.repository.equipment.delete(id).await
    }

    /// Turn names into foreign keys: the department is created on first use,
    /// the assignee and the team must already exist.
    async fn resolve(&self, input: EquipmentInput) -> AppResult<EquipmentRecord> {
        let assigned_employee_id = self.resolve_assignee(&input.assignee).await?;

        if !self.repository.reference.team_exists(input.maintenance_team_id).await? {
            return Err(AppError::Validation(format!(
                "Maintenance team {} not found",
                input.maintenance_team_id
            )));
        }

        let department_id = self.repository.reference.resolve_department(&input.department).await?;

        Ok(EquipmentRecord {
            name: input.name,
            serial_number: input.serial_number,
            category: input.category,
            department_id,
            assigned_employee_id,
            maintenance_team_id: input.maintenance_team_id,
            purchase_date: input.purchase_date,
            warranty_expiry: input.warranty_expiry,
            location: input.location,
            status: input.status,
        })
    }

    async fn resolve_assignee(&self, assignee: &AssigneeRef) -> AppResult<i32> {
        match assignee {
            AssigneeRef::Id(id) => {
                if self.repository.users.exists(*id).await? {
                    Ok(*id)
                } else {
                    Err(AppError::Validation(format!("User {} not found", id)))
                }
            }
            AssigneeRef::Name(name) => {
                let matches = self.repository.users.find_by_name(name).await?;
                match matches.as_slice() {
                    [] => Err(AppError::Validation(format!(
                        "User '{}' not found. Please ensure the technician exists in the system.",
                        name
                    ))),
                    [user] => Ok(user.id),
                    _ => Err(AppError::Validation(format!(
                        "Several users are named '{}'. Please select the technician by id.",
                        name
                    ))),
                }
            }
        }
    }
}
