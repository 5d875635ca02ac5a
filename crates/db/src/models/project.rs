//! Project entity model and DTOs.

use projecthub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub abstract_text: String,
    pub specialization: String,
    pub difficulty: i16,
    pub approval_status: String,
    pub review_feedback: Option<String>,
    pub supervisor_id: DbId,
    pub student_id: Option<DbId>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn validate_specialization(value: &str) -> Result<(), ValidationError> {
    projecthub_core::validation::validate_specialization(value)
        .map_err(|_| ValidationError::new("specialization"))
}

fn validate_technologies(value: &Vec<String>) -> Result<(), ValidationError> {
    let normalized = projecthub_core::validation::normalize_tags(value);
    projecthub_core::validation::validate_technologies(&normalized)
        .map_err(|_| ValidationError::new("technologies"))
}

/// DTO for creating a new project listing.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateProject {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 20, max = 5000))]
    pub abstract_text: String,
    #[validate(custom(function = "validate_specialization"))]
    pub specialization: String,
    #[validate(range(min = 1, max = 5))]
    pub difficulty: i16,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_technologies"))]
    pub technologies: Vec<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProject {
    #[validate(length(min = 5, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 20, max = 5000))]
    pub abstract_text: Option<String>,
    #[validate(custom(function = "validate_specialization"))]
    pub specialization: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<i16>,
    pub tags: Option<Vec<String>>,
    #[validate(custom(function = "validate_technologies"))]
    pub technologies: Option<Vec<String>>,
}

/// Catalogue filters for `GET /projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub specialization: Option<String>,
    pub difficulty: Option<i16>,
    pub approval_status: Option<String>,
    pub supervisor_id: Option<DbId>,
}
