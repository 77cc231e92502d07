//! Equipment repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentRecord, EquipmentRow},
    },
};

const DUPLICATE_SERIAL: &str = "Equipment with this serial number already exists";

/// Flattened projection over an `e` relation (the table or a CTE)
const EQUIPMENT_PROJECTION: &str = r#"
    SELECT e.id, e.name, e.serial_number, e.category,
           e.department_id, d.name AS department_name,
           e.assigned_employee_id, u.name AS assigned_employee_name,
           e.maintenance_team_id, t.name AS maintenance_team_name,
           e.purchase_date, e.warranty_expiry, e.location, e.status,
           e.created_at, e.updated_at
"#;

const EQUIPMENT_JOINS: &str = r#"
    LEFT JOIN departments d ON d.id = e.department_id
    LEFT JOIN users u ON u.id = e.assigned_employee_id
    LEFT JOIN maintenance_teams t ON t.id = e.maintenance_team_id
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment, newest first
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let query = format!(
            "{} FROM equipment e {} ORDER BY e.created_at DESC, e.id DESC",
            EQUIPMENT_PROJECTION, EQUIPMENT_JOINS
        );
        let rows = sqlx::query_as::<_, EquipmentRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Equipment::from).collect())
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Equipment>> {
        let query = format!(
            "{} FROM equipment e {} WHERE e.id = $1",
            EQUIPMENT_PROJECTION, EQUIPMENT_JOINS
        );
        let row = sqlx::query_as::<_, EquipmentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Equipment::from))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipment WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create equipment
    pub async fn create(&self, data: &EquipmentRecord) -> AppResult<Equipment> {
        let query = format!(
            r#"
            WITH e AS (
                INSERT INTO equipment (name, serial_number, category, department_id,
                                       assigned_employee_id, maintenance_team_id,
                                       purchase_date, warranty_expiry, location, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            {} FROM e {}
            "#,
            EQUIPMENT_PROJECTION, EQUIPMENT_JOINS
        );

        let row = sqlx::query_as::<_, EquipmentRow>(&query)
            .bind(&data.name)
            .bind(&data.serial_number)
            .bind(&data.category)
            .bind(data.department_id)
            .bind(data.assigned_employee_id)
            .bind(data.maintenance_team_id)
            .bind(data.purchase_date)
            .bind(data.warranty_expiry)
            .bind(&data.location)
            .bind(data.status.unwrap_or(EquipmentStatus::Active))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_SERIAL))?;

        Ok(row.into())
    }

    /// Replace every field of an equipment row; a missing status keeps the stored one.
    /// Returns `None` when the row does not exist.
    pub async fn update(&self, id: i32, data: &EquipmentRecord) -> AppResult<Option<Equipment>> {
        let query = format!(
            r#"
            WITH e AS (
                UPDATE equipment SET
                    name = $2,
                    serial_number = $3,
                    category = $4,
                    department_id = $5,
                    assigned_employee_id = $6,
                    maintenance_team_id = $7,
                    purchase_date = $8,
                    warranty_expiry = $9,
                    location = $10,
                    status = COALESCE($11, status),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {} FROM e {}
            "#,
            EQUIPMENT_PROJECTION, EQUIPMENT_JOINS
        );

        let row = sqlx::query_as::<_, EquipmentRow>(&query)
            .bind(id)
            .bind(&data.name)
            .bind(&data.serial_number)
            .bind(&data.category)
            .bind(data.department_id)
            .bind(data.assigned_employee_id)
            .bind(data.maintenance_team_id)
            .bind(data.purchase_date)
            .bind(data.warranty_expiry)
            .bind(&data.location)
            .bind(data.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_SERIAL))?;

        Ok(row.map(Equipment::from))
    }

    /// Delete equipment. Returns `false` when nothing was deleted.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_delete(e, "Equipment is referenced by maintenance requests")
            })?;
        Ok(result.rows_affected() > 0)
    }
}
