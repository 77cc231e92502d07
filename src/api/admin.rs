//! Administrative operations

use axum::{extract::State, Json};

use crate::{error::AppResult, models::reference::TeamReconciliation, AppState};

use super::{ApiResponse, AuthenticatedUser};

/// Collapse maintenance teams onto Mechanical, Technical and Vehicle.
///
/// Equipment, requests and memberships on any other team move to the
/// Mechanical team before the extra teams are deleted.
#[utoipa::path(
    post,
    path = "/admin/teams/reconcile",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reconciliation counts", body = TeamReconciliation),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn reconcile_teams(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<TeamReconciliation>>> {
    user.require_admin()?;

    tracing::warn!("Team reconciliation requested by user {}", user.id);
    let outcome = state.services.reference.reconcile_teams().await?;

    Ok(Json(ApiResponse::with_message("Teams reconciled", outcome)))
}
