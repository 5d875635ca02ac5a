//! Notification entity model.

use projecthub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Well-known notification kinds.
pub const KIND_MILESTONE_STATUS: &str = "milestone_status_changed";
pub const KIND_MILESTONE_DUE_SOON: &str = "milestone_due_soon";
pub const KIND_PROPOSAL_REVIEWED: &str = "proposal_reviewed";
pub const KIND_DISCUSSION_REPLY: &str = "discussion_reply";

/// A notification row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub payload: serde_json::Value,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
