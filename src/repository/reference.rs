//! Lookup tables: seeding, listing, name resolution and team reconciliation

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{RoleName, REQUEST_STATUSES},
        reference::{
            Department, MaintenanceTeam, RequestStatus, Role, TeamReconciliation,
            CANONICAL_TEAMS, DEFAULT_DEPARTMENTS, FALLBACK_TEAM,
        },
    },
};

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: Pool<Postgres>,
}

impl ReferenceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert every missing role, department, team and status. Safe to run repeatedly.
    pub async fn seed(&self) -> AppResult<()> {
        let roles: Vec<&str> = RoleName::ALL.iter().map(|r| r.as_str()).collect();

        for (table, names) in [
            ("roles", &roles[..]),
            ("departments", &DEFAULT_DEPARTMENTS[..]),
            ("maintenance_teams", &CANONICAL_TEAMS[..]),
            ("request_statuses", &REQUEST_STATUSES[..]),
        ] {
            let inserted = sqlx::query(&format!(
                "INSERT INTO {} (name) SELECT UNNEST($1::TEXT[]) ON CONFLICT (name) DO NOTHING",
                table
            ))
            .bind(names)
            .execute(&self.pool)
            .await?
            .rows_affected();

            if inserted > 0 {
                tracing::info!("Seeded {} row(s) into {}", inserted, table);
            }
        }

        Ok(())
    }

    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_teams(&self) -> AppResult<Vec<MaintenanceTeam>> {
        let rows = sqlx::query_as::<_, MaintenanceTeam>(
            "SELECT id, name, created_at FROM maintenance_teams ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_statuses(&self) -> AppResult<Vec<RequestStatus>> {
        let rows = sqlx::query_as::<_, RequestStatus>("SELECT id, name FROM request_statuses ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn team_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM maintenance_teams WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Status id for an exact status name
    pub async fn find_status_id(&self, name: &str) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar("SELECT id FROM request_statuses WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_department_id(&self, name: &str) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar("SELECT id FROM departments WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// Department id for `name`, creating the department on first use.
    ///
    /// A concurrent creator may win the insert; the unique violation is then
    /// answered by reading the row it wrote.
    pub async fn resolve_department(&self, name: &str) -> AppResult<i32> {
        if let Some(id) = self.find_department_id(name).await? {
            return Ok(id);
        }

        let inserted = sqlx::query_scalar::<_, i32>("INSERT INTO departments (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(id) => {
                tracing::info!("Created department '{}' (id {})", name, id);
                Ok(id)
            }
            Err(e)
                if e.as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation()) =>
            {
                self.find_department_id(name).await?.ok_or_else(|| {
                    AppError::Internal(format!("Department '{}' vanished after conflict", name))
                })
            }
            Err(e) => Err(AppError::from_write(e, "Department already exists")),
        }
    }

    /// Move everything attached to non-canonical teams onto the fallback team,
    /// then delete those teams. Runs in a single transaction.
    pub async fn reconcile_teams(&self) -> AppResult<TeamReconciliation> {
        let canonical = &CANONICAL_TEAMS[..];
        let mut tx = self.pool.begin().await?;

        let fallback_id: i32 = sqlx::query_scalar(
            "INSERT INTO maintenance_teams (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(FALLBACK_TEAM)
        .fetch_one(&mut *tx)
        .await?;

        let equipment_reassigned = sqlx::query(
            r#"
            UPDATE equipment SET maintenance_team_id = $1, updated_at = NOW()
            WHERE maintenance_team_id IN (SELECT id FROM maintenance_teams WHERE name <> ALL($2))
            "#,
        )
        .bind(fallback_id)
        .bind(canonical)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let requests_reassigned = sqlx::query(
            r#"
            UPDATE maintenance_requests SET team_id = $1, updated_at = NOW()
            WHERE team_id IN (SELECT id FROM maintenance_teams WHERE name <> ALL($2))
            "#,
        )
        .bind(fallback_id)
        .bind(canonical)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let memberships_moved = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            SELECT DISTINCT $1::INT, tm.user_id
            FROM team_members tm
            JOIN maintenance_teams t ON t.id = tm.team_id
            WHERE t.name <> ALL($2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(fallback_id)
        .bind(canonical)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Old memberships go with the teams (ON DELETE CASCADE)
        let teams_deleted = sqlx::query("DELETE FROM maintenance_teams WHERE name <> ALL($1)")
            .bind(canonical)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        let outcome = TeamReconciliation {
            equipment_reassigned,
            requests_reassigned,
            memberships_moved,
            teams_deleted,
        };
        tracing::info!("Team reconciliation finished: {:?}", outcome);
        Ok(outcome)
    }
}
