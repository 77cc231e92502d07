//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserRow, UserSummary, UserSummaryRow},
};

/// User columns plus role and team names aggregated from the junction tables.
/// Callers append a WHERE clause; the GROUP BY is added by `grouped`.
const USER_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.password_hash, u.avatar_url, u.is_active,
           u.created_at, u.updated_at,
           COALESCE(ARRAY_AGG(DISTINCT r.name::TEXT) FILTER (WHERE r.name IS NOT NULL), '{}') AS roles,
           COALESCE(ARRAY_AGG(DISTINCT t.name::TEXT) FILTER (WHERE t.name IS NOT NULL), '{}') AS teams
    FROM users u
    LEFT JOIN user_roles ur ON ur.user_id = u.id
    LEFT JOIN roles r ON r.id = ur.role_id
    LEFT JOIN team_members tm ON tm.user_id = u.id
    LEFT JOIN maintenance_teams t ON t.id = tm.team_id
"#;

fn grouped(filter: &str) -> String {
    format!("{} WHERE {} GROUP BY u.id", USER_SELECT, filter)
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID with roles and teams
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&grouped("u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by email (already normalized by the caller)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&grouped("LOWER(u.email) = LOWER($1)"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// Users whose name matches exactly
    pub async fn find_by_name(&self, name: &str) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY u.id", grouped("u.name = $1")))
            .bind(name)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Active users with their roles, for assignment pickers
    pub async fn list_active(&self) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT u.id, u.name, u.email, u.is_active,
                   COALESCE(ARRAY_AGG(DISTINCT r.name::TEXT) FILTER (WHERE r.name IS NOT NULL), '{}') AS roles
            FROM users u
            LEFT JOIN user_roles ur ON ur.user_id = u.id
            LEFT JOIN roles r ON r.id = ur.role_id
            WHERE u.is_active = TRUE
            GROUP BY u.id
            ORDER BY u.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    /// Create a user with its role and optional team membership.
    ///
    /// An unknown role name inserts no role row.
    pub async fn create(&self, user: &NewUser, password_hash: &str) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, "User with this email already exists"))?;

        let role_rows = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, id FROM roles WHERE name = $2",
        )
        .bind(id)
        .bind(&user.role)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if role_rows == 0 {
            tracing::warn!("Role '{}' not found, user {} created without a role", user.role, id);
        }

        if let Some(team_id) = user.team_id {
            sqlx::query("INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)")
                .bind(team_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::from_write(e, "User is already a member of this team"))?;
        }

        tx.commit().await?;

        self.get_by_id(id).await
    }
}
