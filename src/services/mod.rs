//! Business logic services

pub mod equipment;
pub mod maintenance_requests;
pub mod reference;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub equipment: equipment::EquipmentService,
    pub requests: maintenance_requests::MaintenanceRequestsService,
    pub reference: reference::ReferenceService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(repository.clone()),
            requests: maintenance_requests::MaintenanceRequestsService::new(repository.clone()),
            reference: reference::ReferenceService::new(repository),
        }
    }
}
