//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        reference::{MaintenanceTeam, Role},
        user::{SigninRequest, SignupRequest, User},
    },
    AppState,
};

use super::{ApiResponse, AuthenticatedUser, JsonBody};

/// Signup / signin result
#[derive(Serialize, ToSchema)]
pub struct AuthData {
    pub user: User,
    /// Bearer token
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileData {
    pub user: User,
}

/// Lists for the registration form
#[derive(Serialize, ToSchema)]
pub struct FormData {
    pub roles: Vec<Role>,
    pub teams: Vec<MaintenanceTeam>,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created; `data` holds the user and a token", body = AuthData),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let (token, user) = state.services.users.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User created successfully",
            AuthData { user, token },
        )),
    ))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Login successful; `data` holds the user and a token", body = AuthData),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SigninRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    let (token, user) = state.services.users.signin(request).await?;
    Ok(Json(ApiResponse::with_message(
        "Login successful",
        AuthData { user, token },
    )))
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ProfileData),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<ApiResponse<ProfileData>> {
    Json(ApiResponse::data(ProfileData { user }))
}

/// Roles and teams for the registration form
#[utoipa::path(
    get,
    path = "/auth/form-data",
    tag = "auth",
    responses(
        (status = 200, description = "Roles and teams", body = FormData)
    )
)]
pub async fn form_data(State(state): State<AppState>) -> AppResult<Json<ApiResponse<FormData>>> {
    let reference = &state.services.reference;
    let (roles, teams) = tokio::try_join!(reference.roles(), reference.teams())?;
    Ok(Json(ApiResponse::data(FormData { roles, teams })))
}

/// Log out. Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = super::MessageResponse)
    )
)]
pub async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> Json<ApiResponse<()>> {
    tracing::debug!("User {} logged out", user.id);
    Json(ApiResponse::message("Logout successful"))
}
