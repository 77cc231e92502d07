//! Data models for GearGuard

pub mod enums;
pub mod equipment;
pub mod maintenance_request;
pub mod reference;
pub mod user;

use crate::error::{AppError, AppResult};

/// Reject `value` when it exceeds the `VARCHAR(max)` column it is stored in
pub(crate) fn check_length(label: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters long",
            label, max
        )));
    }
    Ok(())
}
