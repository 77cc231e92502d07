//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{sort_roles, RoleName};
use crate::error::AppError;

/// Internal row structure: user columns plus aggregated role and team names
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    roles: Vec<String>,
    teams: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let mut roles = row.roles;
        sort_roles(&mut roles);
        let mut teams = row.teams;
        teams.sort();

        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            avatar_url: row.avatar_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            role: roles.first().cloned(),
            team: teams.first().cloned(),
            roles,
            teams,
        }
    }
}

/// Full user model with aggregated memberships
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Highest-privilege role
    pub role: Option<String>,
    /// Role names, most privileged first
    pub roles: Vec<String>,
    /// First team by name
    pub team: Option<String>,
    /// Team names, alphabetical
    pub teams: Vec<String>,
}

impl User {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.has_role(RoleName::Admin) {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

/// Row for assignment pickers
#[derive(Debug, Clone, FromRow)]
pub struct UserSummaryRow {
    id: i32,
    name: String,
    email: String,
    is_active: bool,
    roles: Vec<String>,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        let mut roles = row.roles;
        sort_roles(&mut roles);
        UserSummary {
            id: row.id,
            name: row.name,
            email: row.email,
            is_active: row.is_active,
            role: roles.first().cloned(),
            roles,
        }
    }
}

/// Active user as listed in dropdowns
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub role: Option<String>,
    pub roles: Vec<String>,
}

/// Signup request
#[serde_as]
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters long"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Please provide a valid email address"),
        length(max = 150, message = "Email must be at most 150 characters long")
    )]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    /// Role name; defaults to `technician`
    pub role: Option<String>,
    /// Maintenance team id; required unless the role is `admin`
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub team_id: Option<i32>,
}

/// Signin request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub team_id: Option<i32>,
}

/// JWT claims: the user id is the only identity claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub iat: i64,
    pub exp: i64,
}

impl UserClaims {
    pub fn new(user_id: i32, ttl_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            iat: now,
            exp: now + (ttl_hours as i64 * 3600),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(roles: &[&str], teams: &[&str]) -> UserRow {
        UserRow {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            avatar_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            roles: roles.iter().map(|s| s.to_string()).collect(),
            teams: teams.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_primary_role_is_most_privileged() {
        let user = User::from(row(&["operator", "manager"], &["Vehicle Team", "Mechanical Team"]));
        assert_eq!(user.role.as_deref(), Some("manager"));
        assert_eq!(user.roles, vec!["manager", "operator"]);
        assert_eq!(user.team.as_deref(), Some("Mechanical Team"));
    }

    #[test]
    fn test_no_memberships() {
        let user = User::from(row(&[], &[]));
        assert!(user.role.is_none());
        assert!(user.team.is_none());
        assert!(user.require_admin().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::from(row(&["admin"], &[]));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "admin");
        assert!(user.require_admin().is_ok());
    }

    #[test]
    fn test_token_round_trip() {
        let claims = UserClaims::new(42, 1);
        let token = claims.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 42);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = UserClaims {
            user_id: 1,
            iat: 0,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = claims.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_signup_team_id_accepts_string() {
        let req: SignupRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1",
            "teamId": "2"
        }))
        .unwrap();
        assert_eq!(req.team_id, Some(2));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_validation_messages() {
        let req: SignupRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "123"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
