//! Bookmark entity model.

use projecthub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bookmark row from the `bookmarks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bookmark {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for `POST /bookmarks`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookmark {
    pub project_id: DbId,
}
