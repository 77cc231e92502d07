//! Maintenance request endpoints

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
        equipment::Equipment,
        maintenance_request::{MaintenanceRequest, MaintenanceRequestPayload, StatusPatch},
        reference::{MaintenanceTeam, RequestStatus},
        user::UserSummary,
    },
    AppState,
};

use super::{ApiResponse, AuthenticatedUser, JsonBody, PathParam};

/// Lists for the request form
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDropdowns {
    pub equipment: Vec<Equipment>,
    pub maintenance_teams: Vec<MaintenanceTeam>,
    pub users: Vec<UserSummary>,
    pub statuses: Vec<RequestStatus>,
}

/// List all maintenance requests
#[utoipa::path(
    get,
    path = "/maintenance-requests",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<MaintenanceRequest>)
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<MaintenanceRequest>>>> {
    let requests = state.services.requests.list().await?;
    Ok(Json(ApiResponse::data(requests)))
}

/// Get a maintenance request by ID
#[utoipa::path(
    get,
    path = "/maintenance-requests/{id}",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = MaintenanceRequest),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<MaintenanceRequest>>> {
    let request = state.services.requests.get_by_id(id).await?;
    Ok(Json(ApiResponse::data(request)))
}

/// Create a maintenance request; the caller becomes its creator
#[utoipa::path(
    post,
    path = "/maintenance-requests",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    request_body = MaintenanceRequestPayload,
    responses(
        (status = 201, description = "Request created", body = MaintenanceRequest),
        (status = 400, description = "Missing fields, unknown status or unknown reference", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    JsonBody(payload): JsonBody<MaintenanceRequestPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<MaintenanceRequest>>)> {
    let request = state.services.requests.create(payload, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Maintenance request created successfully",
            request,
        )),
    ))
}

/// Replace a maintenance request
#[utoipa::path(
    put,
    path = "/maintenance-requests/{id}",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = MaintenanceRequestPayload,
    responses(
        (status = 200, description = "Request updated", body = MaintenanceRequest),
        (status = 400, description = "Missing fields, unknown status or unknown reference", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<MaintenanceRequestPayload>,
) -> AppResult<Json<ApiResponse<MaintenanceRequest>>> {
    let request = state.services.requests.update(id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Maintenance request updated successfully",
        request,
    )))
}

/// Change only the status of a request
#[utoipa::path(
    patch,
    path = "/maintenance-requests/{id}/status",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = StatusPatch,
    responses(
        (status = 200, description = "Status updated", body = MaintenanceRequest),
        (status = 400, description = "Missing or unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(patch): JsonBody<StatusPatch>,
) -> AppResult<Json<ApiResponse<MaintenanceRequest>>> {
    let request = state.services.requests.update_status(id, patch.status).await?;
    Ok(Json(ApiResponse::with_message("Status updated successfully", request)))
}

/// Delete a maintenance request
#[utoipa::path(
    delete,
    path = "/maintenance-requests/{id}",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request deleted", body = super::MessageResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.services.requests.delete(id).await? {
        return Err(AppError::NotFound("Maintenance request not found".to_string()));
    }
    tracing::info!("Maintenance request {} deleted by user {}", id, user.id);
    Ok(Json(ApiResponse::message("Maintenance request deleted successfully")))
}

/// Equipment, teams, users and statuses for the request form
#[utoipa::path(
    get,
    path = "/maintenance-requests/data/dropdowns",
    tag = "maintenance-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dropdown lists", body = RequestDropdowns)
    )
)]
pub async fn dropdowns(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<RequestDropdowns>>> {
    let services = &state.services;
    let (equipment, maintenance_teams, users, statuses) = tokio::try_join!(
        services.equipment.list(),
        services.reference.teams(),
        services.users.list_assignable(),
        services.reference.statuses(),
    )?;

    Ok(Json(ApiResponse::data(RequestDropdowns {
        equipment,
        maintenance_teams,
        users,
        statuses,
    })))
}
