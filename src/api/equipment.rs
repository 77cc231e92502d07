//! Equipment API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentPayload},
        reference::{Department, MaintenanceTeam},
        user::UserSummary,
    },
    AppState,
};

use super::{ApiResponse, AuthenticatedUser, JsonBody, PathParam};

/// Lists for the equipment form
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDropdowns {
    pub departments: Vec<Department>,
    pub maintenance_teams: Vec<MaintenanceTeam>,
    pub users: Vec<UserSummary>,
}

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list, newest first", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<Equipment>>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(ApiResponse::data(equipment)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(ApiResponse::data(equipment)))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = EquipmentPayload,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Missing fields or unknown assignee", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate serial number", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    JsonBody(payload): JsonBody<EquipmentPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Equipment>>)> {
    let equipment = state.services.equipment.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Equipment created successfully", equipment)),
    ))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = EquipmentPayload,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 400, description = "Missing fields or unknown assignee", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate serial number", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<EquipmentPayload>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    let equipment = state.services.equipment.update(id, payload).await?;
    Ok(Json(ApiResponse::with_message("Equipment updated successfully", equipment)))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment deleted", body = super::MessageResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Equipment still has maintenance requests", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.services.equipment.delete(id).await? {
        return Err(AppError::NotFound("Equipment not found".to_string()));
    }
    tracing::info!("Equipment {} deleted by user {}", id, user.id);
    Ok(Json(ApiResponse::message("Equipment deleted successfully")))
}

/// Departments, teams and assignable users for the equipment form
#[utoipa::path(
    get,
    path = "/equipment/data/dropdowns",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dropdown lists", body = EquipmentDropdowns)
    )
)]
pub async fn dropdowns(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<EquipmentDropdowns>>> {
    let services = &state.services;
    let (departments, maintenance_teams, users) = tokio::try_join!(
        services.reference.departments(),
        services.reference.teams(),
        services.users.list_assignable(),
    )?;

    Ok(Json(ApiResponse::data(EquipmentDropdowns {
        departments,
        maintenance_teams,
        users,
    })))
}
