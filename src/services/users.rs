//! Authentication and user service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::RoleName,
        user::{NewUser, SigninRequest, SignupRequest, User, UserClaims, UserSummary},
    },
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Trimmed, lower-cased email used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SignupRequest {
    /// Apply the signup rules that do not need the database
    pub fn into_new_user(mut self) -> AppResult<NewUser> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.name) || blank(&self.email) || self.password.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::Validation(
                "Name, email, and password are required".to_string(),
            ));
        }

        let role = non_blank(self.role.clone())
            .map(|r| r.to_lowercase())
            .unwrap_or_else(|| RoleName::Technician.as_str().to_string());

        if role != RoleName::Admin.as_str() && self.team_id.is_none() {
            return Err(AppError::Validation("Please select a team".to_string()));
        }

        self.name = non_blank(self.name);
        self.email = self.email.as_deref().map(normalize_email);
        self.validate()?;

        let (Some(name), Some(email), Some(password)) = (self.name, self.email, self.password) else {
            return Err(AppError::Validation(
                "Name, email, and password are required".to_string(),
            ));
        };

        Ok(NewUser {
            name,
            email,
            password,
            role,
            team_id: self.team_id,
        })
    }
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a user and return a token for it
    pub async fn signup(&self, request: SignupRequest) -> AppResult<(String, User)> {
        let new_user = request.into_new_user()?;

        if let Some(team_id) = new_user.team_id {
            if !self.repository.reference.team_exists(team_id).await? {
                return Err(AppError::Validation(format!("Team {} not found", team_id)));
            }
        }

        if self.repository.users.email_exists(&new_user.email).await? {
            return Err(AppError::Conflict("User with this email already exists".to_string()));
        }

        let password_hash = self.hash_password(&new_user.password)?;
        let user = self.repository.users.create(&new_user, &password_hash).await?;

        tracing::info!("User {} registered with role {:?}", user.id, user.role);

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    /// Check credentials and return a token.
    ///
    /// Unknown email, deactivated account and wrong password all produce the same error.
    pub async fn signin(&self, request: SigninRequest) -> AppResult<(String, User)> {
        let (Some(email), Some(password)) = (
            non_blank(request.email),
            request.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::Validation("Email and password are required".to_string()));
        };

        let user = self
            .repository
            .users
            .get_by_email(&normalize_email(&email))
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&user.password_hash, &password)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    /// Resolve the user behind a bearer token.
    ///
    /// Undecodable or expired tokens are an authorization failure; a token for a
    /// user that no longer exists is an authentication failure.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<User> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authorization("Invalid or expired token".to_string()))?;

        let user = match self.repository.users.get_by_id(claims.user_id).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Authentication("User not found".to_string()))
            }
            Err(e) => return Err(e),
        };

        if !user.is_active {
            return Err(AppError::Authorization("Account is deactivated".to_string()));
        }

        Ok(user)
    }

    /// Active users for assignment pickers
    pub async fn list_assignable(&self) -> AppResult<Vec<UserSummary>> {
        self.repository.users.list_active().await
    }

    fn create_token(&self, user_id: i32) -> AppResult<String> {
        UserClaims::new(user_id, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

/// Verify a password against a stored PHC string
fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signup(value: serde_json::Value) -> SignupRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_password_hash_round_trip() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"secret1", &salt)
            .unwrap()
            .to_string();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "secret1").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
        assert!(verify_password("not-a-phc-string", "secret1").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_signup_defaults_to_technician() {
        let user = signup(json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "password": "secret1",
            "teamId": 1
        }))
        .into_new_user()
        .unwrap();

        assert_eq!(user.role, "technician");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.team_id, Some(1));
    }

    #[test]
    fn test_signup_requires_team_unless_admin() {
        let err = signup(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1",
            "role": "manager"
        }))
        .into_new_user()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Please select a team"));

        let admin = signup(json!({
            "name": "Root",
            "email": "root@example.com",
            "password": "secret1",
            "role": "Admin"
        }))
        .into_new_user()
        .unwrap();
        assert_eq!(admin.role, "admin");
        assert!(admin.team_id.is_none());
    }

    #[test]
    fn test_signup_missing_fields() {
        let err = signup(json!({ "email": "ada@example.com", "password": "secret1", "teamId": 1 }))
            .into_new_user()
            .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "Name, email, and password are required")
        );
    }

    #[test]
    fn test_signup_trims_email_before_validating() {
        let user = signup(json!({
            "name": "  Ada ",
            "email": " Ada@Example.com ",
            "password": "secret1",
            "teamId": "1"
        }))
        .into_new_user()
        .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_signup_empty_team_id_needs_a_team() {
        let err = signup(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1",
            "teamId": ""
        }))
        .into_new_user()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Please select a team"));
    }

    #[test]
    fn test_signup_rejects_values_longer_than_columns() {
        let err = signup(json!({
            "name": "n".repeat(120),
            "email": "ada@example.com",
            "password": "secret1",
            "teamId": 1
        }))
        .into_new_user()
        .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "Name must be at most 100 characters long")
        );

        let err = signup(json!({
            "name": "Ada",
            "email": format!("{}@example.com", "a".repeat(140)),
            "password": "secret1",
            "teamId": 1
        }))
        .into_new_user()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("150 characters")));
    }

    #[test]
    fn test_signup_rejects_short_password() {
        let err = signup(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "123",
            "teamId": 1
        }))
        .into_new_user()
        .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg.contains("at least 6 characters"))
        );
    }
}
