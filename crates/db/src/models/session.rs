//! Refresh-token session model.

use projecthub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table.
///
/// `refresh_token_hash` is a SHA-256 hex digest; the raw token is never
/// stored.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
