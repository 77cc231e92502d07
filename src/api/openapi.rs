//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, equipment, health, maintenance_requests};

/// Registers the bearer scheme referenced by `security(("bearer_auth" = []))`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GearGuard API",
        version = "1.0.0",
        description = "Maintenance management REST API. Successful responses wrap the documented body in `{ success, message?, data }`.",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::signin,
        auth::profile,
        auth::form_data,
        auth::logout,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::dropdowns,
        // Maintenance requests
        maintenance_requests::list_requests,
        maintenance_requests::get_request,
        maintenance_requests::create_request,
        maintenance_requests::update_request,
        maintenance_requests::update_status,
        maintenance_requests::delete_request,
        maintenance_requests::dropdowns,
        // Admin
        admin::reconcile_teams,
    ),
    components(
        schemas(
            // Auth
            auth::AuthData,
            auth::ProfileData,
            auth::FormData,
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::SignupRequest,
            crate::models::user::SigninRequest,
            // Reference data
            crate::models::reference::Role,
            crate::models::reference::Department,
            crate::models::reference::MaintenanceTeam,
            crate::models::reference::RequestStatus,
            crate::models::reference::TeamReconciliation,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentPayload,
            crate::models::enums::EquipmentStatus,
            equipment::EquipmentDropdowns,
            // Maintenance requests
            crate::models::maintenance_request::MaintenanceRequest,
            crate::models::maintenance_request::MaintenanceRequestPayload,
            crate::models::maintenance_request::StatusPatch,
            crate::models::enums::RequestType,
            maintenance_requests::RequestDropdowns,
            // Health
            health::HealthResponse,
            // Envelopes
            super::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipment", description = "Equipment registry"),
        (name = "maintenance-requests", description = "Maintenance request tracking"),
        (name = "admin", description = "Reference data administration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
