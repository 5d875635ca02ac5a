//! Milestone discussion and reply models.

use projecthub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A discussion thread attached to a milestone.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MilestoneDiscussion {
    pub id: DbId,
    pub milestone_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A reply within a discussion thread.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscussionReply {
    pub id: DbId,
    pub discussion_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for creating a discussion or a reply. Content is sanitized by the
/// API layer before insert.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateDiscussionPost {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}
