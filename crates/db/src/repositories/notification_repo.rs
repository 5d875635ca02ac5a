//! Repository for the `notifications` table.

use projecthub_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;

const COLUMNS: &str = "id, user_id, kind, payload, read_at, created_at";

/// Provides operations for user notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        kind: &str,
        payload: &serde_json::Value,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, kind, payload)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(kind)
            .bind(payload)
            .fetch_one(pool)
            .await
    }

    /// A user's notifications, newest first, by page.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification read. Scoped to the owner so a user cannot
    /// mark someone else's. Returns `true` if a row was updated.
    pub async fn mark_read(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW()
             WHERE id = $1 AND user_id = $2 AND read_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's notifications read. Returns how many changed.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Whether a `milestone_due_soon` reminder already exists for this
    /// milestone and user. Keeps the sweeper idempotent across runs.
    pub async fn due_reminder_exists(
        pool: &PgPool,
        user_id: DbId,
        milestone_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM notifications
                WHERE user_id = $1
                  AND kind = 'milestone_due_soon'
                  AND (payload ->> 'milestone_id')::bigint = $2
             )",
        )
        .bind(user_id)
        .bind(milestone_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
