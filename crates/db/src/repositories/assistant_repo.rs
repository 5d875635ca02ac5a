//! Repository for assistant chat history and message ratings.

use projecthub_core::types::DbId;
use sqlx::PgPool;

use crate::models::assistant::{AssistantMessage, MessageRating};

const MESSAGE_COLUMNS: &str = "id, user_id, sender, content, created_at";
const RATING_COLUMNS: &str = "id, message_id, user_id, rating, created_at";

/// Provides operations for the AI assistant chat log.
pub struct AssistantRepo;

impl AssistantRepo {
    /// Append a chat message to a user's history.
    pub async fn insert_message(
        pool: &PgPool,
        user_id: DbId,
        sender: &str,
        content: &str,
    ) -> Result<AssistantMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO assistant_messages (user_id, sender, content)
             VALUES ($1, $2, $3)
             RETURNING {MESSAGE_COLUMNS}"
        );
        sqlx::query_as::<_, AssistantMessage>(&query)
            .bind(user_id)
            .bind(sender)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Find a message by ID.
    pub async fn find_message(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssistantMessage>, sqlx::Error> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM assistant_messages WHERE id = $1");
        sqlx::query_as::<_, AssistantMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's chat history, oldest first, by page.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AssistantMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM assistant_messages
             WHERE user_id = $1
             ORDER BY created_at ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AssistantMessage>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Rate a message. A second rating by the same user violates
    /// `uq_message_ratings_message_user`, which the API maps to 409.
    pub async fn rate_message(
        pool: &PgPool,
        message_id: DbId,
        user_id: DbId,
        rating: f64,
    ) -> Result<MessageRating, sqlx::Error> {
        let query = format!(
            "INSERT INTO message_ratings (message_id, user_id, rating)
             VALUES ($1, $2, $3)
             RETURNING {RATING_COLUMNS}"
        );
        sqlx::query_as::<_, MessageRating>(&query)
            .bind(message_id)
            .bind(user_id)
            .bind(rating)
            .fetch_one(pool)
            .await
    }
}
