//! Milestone entity model and DTOs.

use projecthub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// All valid priority values, in CHECK-constraint order.
pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

/// A milestone row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Timestamp,
    pub estimated_hours: Option<i32>,
    pub actual_hours: Option<i32>,
    pub blocking_reason: Option<String>,
    pub reminder_days_before: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    if VALID_PRIORITIES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("priority"))
    }
}

/// DTO for creating a new milestone.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateMilestone {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_priority"))]
    #[serde(default = "default_priority")]
    pub priority: String,
    pub due_date: Timestamp,
    #[validate(range(min = 0))]
    pub estimated_hours: Option<i32>,
    #[validate(range(min = 0, max = 90))]
    pub reminder_days_before: Option<i32>,
}

fn default_priority() -> String {
    "medium".to_string()
}

/// DTO for updating milestone fields (not status -- that has its own
/// endpoint so the transition check cannot be bypassed).
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMilestone {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    #[validate(range(min = 0))]
    pub estimated_hours: Option<i32>,
    #[validate(range(min = 0))]
    pub actual_hours: Option<i32>,
    #[validate(range(min = 0, max = 90))]
    pub reminder_days_before: Option<i32>,
}

/// DTO for `PATCH /milestones/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChangeMilestoneStatus {
    pub status: String,
    /// Required when moving to `blocked`; sanitized before storage.
    #[validate(length(max = 1000))]
    pub blocking_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_rejected() {
        let err = serde_json::from_str::<ChangeMilestoneStatus>(
            r#"{"status": "blocked", "surprise": true}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("surprise"));
    }

    #[test]
    fn test_create_defaults_priority_to_medium() {
        let dto: CreateMilestone = serde_json::from_str(
            r#"{"title": "Literature review", "due_date": "2026-12-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(dto.priority, "medium");
    }

    #[test]
    fn test_invalid_priority_fails_validation() {
        use validator::Validate;
        let dto: CreateMilestone = serde_json::from_str(
            r#"{"title": "Prototype", "priority": "urgent", "due_date": "2026-12-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
