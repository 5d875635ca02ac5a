//! Student and supervisor profile models.

use projecthub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A student profile row (one-to-one with a `users` row).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentProfile {
    pub user_id: DbId,
    pub matric_number: String,
    pub specialization: String,
    pub enrollment_year: i32,
}

/// A supervisor profile row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupervisorProfile {
    pub user_id: DbId,
    pub department: String,
    pub capacity: i32,
}

fn validate_specialization(value: &str) -> Result<(), ValidationError> {
    projecthub_core::validation::validate_specialization(value)
        .map_err(|_| ValidationError::new("specialization"))
}

/// DTO for creating a student profile at registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateStudentProfile {
    #[validate(length(min = 4, max = 20))]
    pub matric_number: String,
    #[validate(custom(function = "validate_specialization"))]
    pub specialization: String,
    #[validate(range(min = 2000, max = 2100))]
    pub enrollment_year: i32,
}

/// DTO for creating a supervisor profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateSupervisorProfile {
    #[validate(length(min = 2, max = 100))]
    pub department: String,
    #[validate(range(min = 0, max = 50))]
    pub capacity: i32,
}
