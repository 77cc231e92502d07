//! Maintenance requests repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::maintenance_request::{
        MaintenanceRequest, MaintenanceRequestRecord, MaintenanceRequestRow,
    },
};

/// Flattened projection over an `mr` relation (the table or a CTE)
const REQUEST_PROJECTION: &str = r#"
    SELECT mr.id, mr.subject, mr.description,
           mr.equipment_id, e.name AS equipment_name, e.serial_number AS equipment_serial,
           mr.team_id, t.name AS team_name,
           mr.request_type,
           mr.status_id, s.name AS status_name,
           mr.assigned_to, a.name AS assigned_to_name,
           mr.created_by, c.name AS created_by_name,
           mr.scheduled_date, mr.started_at, mr.completed_at, mr.duration_hours,
           mr.is_overdue, mr.created_at, mr.updated_at
"#;

const REQUEST_JOINS: &str = r#"
    LEFT JOIN equipment e ON e.id = mr.equipment_id
    LEFT JOIN maintenance_teams t ON t.id = mr.team_id
    LEFT JOIN request_statuses s ON s.id = mr.status_id
    LEFT JOIN users a ON a.id = mr.assigned_to
    LEFT JOIN users c ON c.id = mr.created_by
"#;

#[derive(Clone)]
pub struct MaintenanceRequestsRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all requests, newest first
    pub async fn list(&self) -> AppResult<Vec<MaintenanceRequest>> {
        let query = format!(
            "{} FROM maintenance_requests mr {} ORDER BY mr.created_at DESC, mr.id DESC",
            REQUEST_PROJECTION, REQUEST_JOINS
        );
        let rows = sqlx::query_as::<_, MaintenanceRequestRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MaintenanceRequest::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<MaintenanceRequest>> {
        let query = format!(
            "{} FROM maintenance_requests mr {} WHERE mr.id = $1",
            REQUEST_PROJECTION, REQUEST_JOINS
        );
        let row = sqlx::query_as::<_, MaintenanceRequestRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(MaintenanceRequest::from))
    }

    /// Create a request on behalf of `created_by`
    pub async fn create(
        &self,
        data: &MaintenanceRequestRecord,
        created_by: i32,
    ) -> AppResult<MaintenanceRequest> {
        let query = format!(
            r#"
            WITH mr AS (
                INSERT INTO maintenance_requests (
                    subject, description, equipment_id, team_id, request_type, status_id,
                    assigned_to, created_by, scheduled_date, started_at, completed_at,
                    duration_hours, is_overdue
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING *
            )
            {} FROM mr {}
            "#,
            REQUEST_PROJECTION, REQUEST_JOINS
        );

        let row = sqlx::query_as::<_, MaintenanceRequestRow>(&query)
            .bind(&data.subject)
            .bind(&data.description)
            .bind(data.equipment_id)
            .bind(data.team_id)
            .bind(data.request_type)
            .bind(data.status_id)
            .bind(data.assigned_to)
            .bind(created_by)
            .bind(data.scheduled_date)
            .bind(data.started_at)
            .bind(data.completed_at)
            .bind(data.duration_hours)
            .bind(data.is_overdue)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Maintenance request already exists"))?;

        Ok(row.into())
    }

    /// Replace every editable field; the creator is never changed.
    /// Returns `None` when the row does not exist.
    pub async fn update(
        &self,
        id: i32,
        data: &MaintenanceRequestRecord,
    ) -> AppResult<Option<MaintenanceRequest>> {
        let query = format!(
            r#"
            WITH mr AS (
                UPDATE maintenance_requests SET
                    subject = $2,
                    description = $3,
                    equipment_id = $4,
                    team_id = $5,
                    request_type = $6,
                    status_id = $7,
                    assigned_to = $8,
                    scheduled_date = $9,
                    started_at = $10,
                    completed_at = $11,
                    duration_hours = $12,
                    is_overdue = $13,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {} FROM mr {}
            "#,
            REQUEST_PROJECTION, REQUEST_JOINS
        );

        let row = sqlx::query_as::<_, MaintenanceRequestRow>(&query)
            .bind(id)
            .bind(&data.subject)
            .bind(&data.description)
            .bind(data.equipment_id)
            .bind(data.team_id)
            .bind(data.request_type)
            .bind(data.status_id)
            .bind(data.assigned_to)
            .bind(data.scheduled_date)
            .bind(data.started_at)
            .bind(data.completed_at)
            .bind(data.duration_hours)
            .bind(data.is_overdue)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Maintenance request already exists"))?;

        Ok(row.map(MaintenanceRequest::from))
    }

    /// Set the status and touch `updated_at`; nothing else changes
    pub async fn update_status(
        &self,
        id: i32,
        status_id: i32,
    ) -> AppResult<Option<MaintenanceRequest>> {
        let query = format!(
            r#"
            WITH mr AS (
                UPDATE maintenance_requests
                SET status_id = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {} FROM mr {}
            "#,
            REQUEST_PROJECTION, REQUEST_JOINS
        );

        let row = sqlx::query_as::<_, MaintenanceRequestRow>(&query)
            .bind(id)
            .bind(status_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MaintenanceRequest::from))
    }

    /// Delete a request. Returns `false` when nothing was deleted.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
