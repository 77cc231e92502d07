//! Lookup tables: roles, departments, maintenance teams, request statuses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTeam {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestStatus {
    pub id: i32,
    pub name: String,
}

/// Departments present on a fresh install
pub const DEFAULT_DEPARTMENTS: [&str; 8] = [
    "Production",
    "IT",
    "Logistics",
    "Maintenance",
    "Quality Control",
    "Administration",
    "Operations",
    "Engineering",
];

/// The only maintenance teams the deployment recognizes
pub const CANONICAL_TEAMS: [&str; 3] = ["Mechanical Team", "Technical Team", "Vehicle Team"];

/// Team that inherits rows from non-canonical teams during reconciliation
pub const FALLBACK_TEAM: &str = "Mechanical Team";

/// Outcome of a team reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamReconciliation {
    pub equipment_reassigned: u64,
    pub requests_reassigned: u64,
    pub memberships_moved: u64,
    pub teams_deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_team_is_canonical() {
        assert!(CANONICAL_TEAMS.contains(&FALLBACK_TEAM));
    }
}
