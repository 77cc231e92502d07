//! Shared domain enums

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements sqlx TEXT mapping through `as_str` / `FromStr`.
macro_rules! impl_text_column {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// RoleName
// ---------------------------------------------------------------------------

/// Fixed role vocabulary, declared from most to least privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Manager,
    Technician,
    Operator,
}

impl RoleName {
    pub const ALL: [RoleName; 4] = [
        RoleName::Admin,
        RoleName::Manager,
        RoleName::Technician,
        RoleName::Operator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Manager => "manager",
            RoleName::Technician => "technician",
            RoleName::Operator => "operator",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(RoleName::Admin),
            "manager" => Ok(RoleName::Manager),
            "technician" => Ok(RoleName::Technician),
            "operator" => Ok(RoleName::Operator),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Sort role names by privilege; names outside the vocabulary go last, alphabetically.
pub fn sort_roles(roles: &mut [String]) {
    roles.sort_by(|a, b| {
        let ra = a.parse::<RoleName>().ok();
        let rb = b.parse::<RoleName>().ok();
        match (ra, rb) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Equipment lifecycle status. Stored lowercase, displayed capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    Active,
    Scrapped,
}

impl EquipmentStatus {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "active",
            EquipmentStatus::Scrapped => "scrapped",
        }
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(EquipmentStatus::Active),
            "scrapped" => Ok(EquipmentStatus::Scrapped),
            _ => Err(format!("Invalid equipment status: {}", s)),
        }
    }
}

impl_text_column!(EquipmentStatus);

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestType {
    Corrective,
    Preventive,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Corrective => "Corrective",
            RequestType::Preventive => "Preventive",
        }
    }
}

impl std::str::FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corrective" => Ok(RequestType::Corrective),
            "preventive" => Ok(RequestType::Preventive),
            _ => Err(format!("Invalid request type: {}", s)),
        }
    }
}

impl_text_column!(RequestType);

// ---------------------------------------------------------------------------
// Request status vocabulary
// ---------------------------------------------------------------------------

/// Names seeded into `request_statuses`, in board order
pub const REQUEST_STATUSES: [&str; 4] = ["New", "In Progress", "Repaired", "Scrap"];

/// Statuses after which a request can no longer be overdue
pub const CLOSED_REQUEST_STATUSES: [&str; 2] = ["Repaired", "Scrap"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<RoleName>(), Ok(RoleName::Admin));
        assert_eq!(" technician ".parse::<RoleName>(), Ok(RoleName::Technician));
        assert!("janitor".parse::<RoleName>().is_err());
    }

    #[test]
    fn test_sort_roles_by_privilege() {
        let mut roles = vec![
            "operator".to_string(),
            "zzz".to_string(),
            "admin".to_string(),
            "technician".to_string(),
        ];
        sort_roles(&mut roles);
        assert_eq!(roles, vec!["admin", "technician", "operator", "zzz"]);
    }

    #[test]
    fn test_equipment_status_labels() {
        assert_eq!("Scrapped".parse::<EquipmentStatus>(), Ok(EquipmentStatus::Scrapped));
        assert_eq!("active".parse::<EquipmentStatus>(), Ok(EquipmentStatus::Active));
        assert!("broken".parse::<EquipmentStatus>().is_err());
        assert_eq!(EquipmentStatus::Scrapped.as_str(), "scrapped");
    }

    #[test]
    fn test_request_type_parsing() {
        assert_eq!("preventive".parse::<RequestType>(), Ok(RequestType::Preventive));
        assert_eq!("Corrective".parse::<RequestType>(), Ok(RequestType::Corrective));
        assert!("Emergency".parse::<RequestType>().is_err());
    }
}
