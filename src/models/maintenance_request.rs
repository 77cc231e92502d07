//! Maintenance request model and payloads

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, NoneAsEmptyString, PickFirst};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{
    check_length,
    enums::{RequestType, CLOSED_REQUEST_STATUSES},
};
use crate::error::{AppError, AppResult};

/// Request row joined with equipment, team, status and user names
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceRequestRow {
    id: i32,
    subject: String,
    description: Option<String>,
    equipment_id: i32,
    equipment_name: Option<String>,
    equipment_serial: Option<String>,
    team_id: i32,
    team_name: Option<String>,
    request_type: RequestType,
    status_id: i32,
    status_name: Option<String>,
    assigned_to: Option<i32>,
    assigned_to_name: Option<String>,
    created_by: i32,
    created_by_name: Option<String>,
    scheduled_date: Option<NaiveDate>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    duration_hours: Option<Decimal>,
    is_overdue: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A request is overdue when flagged, or when its scheduled date has passed
/// while it is still open.
pub fn is_overdue(
    flagged: bool,
    scheduled_date: Option<NaiveDate>,
    status: Option<&str>,
    today: NaiveDate,
) -> bool {
    if flagged {
        return true;
    }
    let closed = status.is_some_and(|s| CLOSED_REQUEST_STATUSES.contains(&s));
    matches!(scheduled_date, Some(date) if date < today) && !closed
}

impl From<MaintenanceRequestRow> for MaintenanceRequest {
    fn from(row: MaintenanceRequestRow) -> Self {
        let overdue = is_overdue(
            row.is_overdue,
            row.scheduled_date,
            row.status_name.as_deref(),
            Utc::now().date_naive(),
        );

        MaintenanceRequest {
            id: row.id,
            subject: row.subject,
            description: row.description,
            equipment_id: row.equipment_id,
            equipment_name: row.equipment_name,
            equipment_serial: row.equipment_serial,
            team_id: row.team_id,
            team_name: row.team_name,
            request_type: row.request_type,
            status_id: row.status_id,
            status: row.status_name,
            assigned_to: row.assigned_to,
            assigned_technician: row.assigned_to_name,
            created_by: row.created_by,
            created_by_name: row.created_by_name,
            scheduled_date: row.scheduled_date,
            started_at: row.started_at,
            completed_at: row.completed_at,
            duration_hours: row.duration_hours,
            is_overdue: overdue,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Maintenance request, flattened for display
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: i32,
    pub subject: String,
    pub description: Option<String>,
    pub equipment_id: i32,
    pub equipment_name: Option<String>,
    pub equipment_serial: Option<String>,
    pub team_id: i32,
    pub team_name: Option<String>,
    pub request_type: RequestType,
    pub status_id: i32,
    /// Status name
    pub status: Option<String>,
    pub assigned_to: Option<i32>,
    /// Assignee name
    pub assigned_technician: Option<String>,
    pub created_by: i32,
    pub created_by_name: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>)]
    pub duration_hours: Option<Decimal>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update request body
#[serde_as]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequestPayload {
    pub subject: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub equipment_id: Option<i32>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub team_id: Option<i32>,
    /// "Corrective" or "Preventive"
    pub request_type: Option<String>,
    /// Status name, e.g. "New"
    pub status: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub assigned_to: Option<i32>,
    /// Required for preventive requests
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<f64>)]
    pub duration_hours: Option<Decimal>,
    pub is_overdue: Option<bool>,
}

/// Status-only update body
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusPatch {
    pub status: Option<String>,
}

/// Request fields after presence checks; the status is still a name
#[derive(Debug, Clone)]
pub struct MaintenanceRequestInput {
    pub subject: String,
    pub description: Option<String>,
    pub equipment_id: i32,
    pub team_id: i32,
    pub request_type: RequestType,
    pub status: String,
    pub assigned_to: Option<i32>,
    pub scheduled_date: Option<NaiveDate>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_hours: Option<Decimal>,
    pub is_overdue: Option<bool>,
}

/// Column values ready to be written
#[derive(Debug, Clone)]
pub struct MaintenanceRequestRecord {
    pub subject: String,
    pub description: Option<String>,
    pub equipment_id: i32,
    pub team_id: i32,
    pub request_type: RequestType,
    pub status_id: i32,
    pub assigned_to: Option<i32>,
    pub scheduled_date: Option<NaiveDate>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_hours: Option<Decimal>,
    pub is_overdue: bool,
}

impl MaintenanceRequestInput {
    pub fn into_record(self, status_id: i32) -> MaintenanceRequestRecord {
        MaintenanceRequestRecord {
            subject: self.subject,
            description: self.description,
            equipment_id: self.equipment_id,
            team_id: self.team_id,
            request_type: self.request_type,
            status_id,
            assigned_to: self.assigned_to,
            scheduled_date: self.scheduled_date,
            started_at: self.started_at,
            completed_at: self.completed_at,
            duration_hours: self.duration_hours,
            is_overdue: self.is_overdue.unwrap_or(false),
        }
    }
}

/// `maintenance_requests.subject` is VARCHAR(255)
const SUBJECT_MAX: usize = 255;

/// NUMERIC(5,2) upper bound
const MAX_DURATION_HOURS: i64 = 1000;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MaintenanceRequestPayload {
    /// Check required fields, the request type and the duration bounds
    pub fn into_input(self) -> AppResult<MaintenanceRequestInput> {
        let (Some(subject), Some(equipment_id), Some(team_id), Some(request_type), Some(status)) = (
            non_blank(self.subject),
            self.equipment_id,
            self.team_id,
            non_blank(self.request_type),
            non_blank(self.status),
        ) else {
            return Err(AppError::Validation(
                "Subject, equipment, team, request type, and status are required".to_string(),
            ));
        };

        check_length("Subject", &subject, SUBJECT_MAX)?;

        let request_type: RequestType = request_type.parse().map_err(AppError::Validation)?;

        if request_type == RequestType::Preventive && self.scheduled_date.is_none() {
            return Err(AppError::Validation(
                "Scheduled date is required for preventive requests".to_string(),
            ));
        }

        let duration_hours = self.duration_hours.map(|d| d.round_dp(2));
        if let Some(hours) = duration_hours {
            if hours.is_sign_negative() || hours >= Decimal::from(MAX_DURATION_HOURS) {
                return Err(AppError::Validation(
                    "Duration must be between 0 and 999.99 hours".to_string(),
                ));
            }
        }

        Ok(MaintenanceRequestInput {
            subject,
            description: non_blank(self.description),
            equipment_id,
            team_id,
            request_type,
            status,
            assigned_to: self.assigned_to,
            scheduled_date: self.scheduled_date,
            started_at: self.started_at,
            completed_at: self.completed_at,
            duration_hours,
            is_overdue: self.is_overdue,
        })
    }
}
