//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{check_length, enums::EquipmentStatus};
use crate::error::{AppError, AppResult};

/// Column limits from the `equipment` and `departments` tables
const NAME_MAX: usize = 150;
const SERIAL_MAX: usize = 100;
const CATEGORY_MAX: usize = 100;
const DEPARTMENT_MAX: usize = 100;
const LOCATION_MAX: usize = 150;

/// Equipment row joined with its department, assignee and team names
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    id: i32,
    name: String,
    serial_number: String,
    category: Option<String>,
    department_id: i32,
    department_name: Option<String>,
    assigned_employee_id: Option<i32>,
    assigned_employee_name: Option<String>,
    maintenance_team_id: i32,
    maintenance_team_name: Option<String>,
    purchase_date: Option<NaiveDate>,
    warranty_expiry: Option<NaiveDate>,
    location: Option<String>,
    status: EquipmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EquipmentRow> for Equipment {
    fn from(row: EquipmentRow) -> Self {
        Equipment {
            id: row.id,
            name: row.name,
            serial_number: row.serial_number,
            category: row.category,
            department: row.department_name,
            department_id: row.department_id,
            assigned_employee: row.assigned_employee_name,
            assigned_employee_id: row.assigned_employee_id,
            maintenance_team: row.maintenance_team_name,
            maintenance_team_id: row.maintenance_team_id,
            purchase_date: row.purchase_date,
            warranty_expiry: row.warranty_expiry,
            location: row.location,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Equipment record, flattened for display
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub category: Option<String>,
    /// Department name
    pub department: Option<String>,
    pub department_id: i32,
    /// Assigned employee name
    pub assigned_employee: Option<String>,
    pub assigned_employee_id: Option<i32>,
    /// Maintenance team name
    pub maintenance_team: Option<String>,
    pub maintenance_team_id: i32,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: Option<String>,
    pub status: EquipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update equipment request body
#[serde_as]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPayload {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    /// Department name; created when unknown
    pub department: Option<String>,
    /// Assignee name (exact match); ignored when `assignedEmployeeId` is set
    pub assigned_employee: Option<String>,
    /// Number or numeric string; empty string means none
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub assigned_employee_id: Option<i32>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub maintenance_team_id: Option<i32>,
    /// YYYY-MM-DD; empty string means none
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[schema(value_type = Option<String>, format = Date)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[schema(value_type = Option<String>, format = Date)]
    pub warranty_expiry: Option<NaiveDate>,
    pub location: Option<String>,
    /// "Active" or "Scrapped" (update only); omitted keeps the current status
    pub status: Option<String>,
}

/// How the caller identified the assigned employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeRef {
    Id(i32),
    Name(String),
}

/// Equipment fields after presence checks, before foreign keys are resolved
#[derive(Debug, Clone)]
pub struct EquipmentInput {
    pub name: String,
    pub serial_number: String,
    pub category: Option<String>,
    pub department: String,
    pub assignee: AssigneeRef,
    pub maintenance_team_id: i32,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: String,
    pub status: Option<EquipmentStatus>,
}

/// Column values ready to be written
#[derive(Debug, Clone)]
pub struct EquipmentRecord {
    pub name: String,
    pub serial_number: String,
    pub category: Option<String>,
    pub department_id: i32,
    pub assigned_employee_id: i32,
    pub maintenance_team_id: i32,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: String,
    pub status: Option<EquipmentStatus>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EquipmentPayload {
    /// Check required fields and parse the status label
    pub fn into_input(self) -> AppResult<EquipmentInput> {
        let assignee = match (self.assigned_employee_id, non_blank(self.assigned_employee)) {
            (Some(id), _) => Some(AssigneeRef::Id(id)),
            (None, Some(name)) => Some(AssigneeRef::Name(name)),
            (None, None) => None,
        };

        let (
            Some(name),
            Some(serial_number),
            Some(department),
            Some(assignee),
            Some(maintenance_team_id),
            Some(location),
        ) = (
            non_blank(self.name),
            non_blank(self.serial_number),
            non_blank(self.department),
            assignee,
            self.maintenance_team_id,
            non_blank(self.location),
        )
        else {
            return Err(AppError::Validation(
                "Name, serial number, department, assigned technician, maintenance team, and location are required"
                    .to_string(),
            ));
        };

        let category = non_blank(self.category);
        check_length("Name", &name, NAME_MAX)?;
        check_length("Serial number", &serial_number, SERIAL_MAX)?;
        check_length("Department", &department, DEPARTMENT_MAX)?;
        check_length("Location", &location, LOCATION_MAX)?;
        if let Some(category) = &category {
            check_length("Category", category, CATEGORY_MAX)?;
        }

        let status = non_blank(self.status)
            .map(|s| s.parse::<EquipmentStatus>())
            .transpose()
            .map_err(AppError::Validation)?;

        Ok(EquipmentInput {
            name,
            serial_number,
            category,
            department,
            assignee,
            maintenance_team_id,
            purchase_date: self.purchase_date,
            warranty_expiry: self.warranty_expiry,
            location,
            status,
        })
    }
}
