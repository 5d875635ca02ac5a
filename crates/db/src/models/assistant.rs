//! AI assistant chat message and rating models.

use projecthub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Sender discriminator for `assistant_messages.sender`.
pub const SENDER_USER: &str = "user";
pub const SENDER_ASSISTANT: &str = "assistant";

/// A chat message row from the `assistant_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssistantMessage {
    pub id: DbId,
    pub user_id: DbId,
    pub sender: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// A rating row from the `message_ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageRating {
    pub id: DbId,
    pub message_id: DbId,
    pub user_id: DbId,
    pub rating: f64,
    pub created_at: Timestamp,
}

/// DTO for `POST /assistant/chat`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

/// DTO for `POST /assistant/messages/{id}/rating`.
///
/// The range mirrors the CHECK constraint on `message_ratings.rating`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RateMessage {
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f64,
}
