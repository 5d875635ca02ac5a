//! Repository for the `bookmarks` table.

use projecthub_core::types::DbId;
use sqlx::PgPool;

use crate::models::bookmark::Bookmark;

const COLUMNS: &str = "id, user_id, project_id, created_at";

/// Provides operations for user bookmarks.
pub struct BookmarkRepo;

impl BookmarkRepo {
    /// Insert a bookmark. A duplicate (user, project) pair violates
    /// `uq_bookmarks_user_project`, which the API maps to 409.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<Bookmark, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookmarks (user_id, project_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(user_id)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// A user's bookmarks, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Bookmark>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookmarks WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a bookmark. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND project_id = $2")
            .bind(user_id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
