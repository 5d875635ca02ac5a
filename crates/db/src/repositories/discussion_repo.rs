//! Repository for milestone discussions and replies.

use projecthub_core::types::DbId;
use sqlx::PgPool;

use crate::models::discussion::{DiscussionReply, MilestoneDiscussion};

const DISCUSSION_COLUMNS: &str = "id, milestone_id, author_id, content, created_at, updated_at";
const REPLY_COLUMNS: &str = "id, discussion_id, author_id, content, created_at";

/// Provides operations for discussion threads.
pub struct DiscussionRepo;

impl DiscussionRepo {
    /// Start a new discussion thread on a milestone.
    pub async fn create_discussion(
        pool: &PgPool,
        milestone_id: DbId,
        author_id: DbId,
        content: &str,
    ) -> Result<MilestoneDiscussion, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestone_discussions (milestone_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {DISCUSSION_COLUMNS}"
        );
        sqlx::query_as::<_, MilestoneDiscussion>(&query)
            .bind(milestone_id)
            .bind(author_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Find a discussion thread by ID.
    pub async fn find_discussion(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MilestoneDiscussion>, sqlx::Error> {
        let query = format!("SELECT {DISCUSSION_COLUMNS} FROM milestone_discussions WHERE id = $1");
        sqlx::query_as::<_, MilestoneDiscussion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A milestone's discussion threads, oldest first.
    pub async fn list_by_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Vec<MilestoneDiscussion>, sqlx::Error> {
        let query = format!(
            "SELECT {DISCUSSION_COLUMNS} FROM milestone_discussions
             WHERE milestone_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, MilestoneDiscussion>(&query)
            .bind(milestone_id)
            .fetch_all(pool)
            .await
    }

    /// Add a reply to a discussion thread.
    pub async fn create_reply(
        pool: &PgPool,
        discussion_id: DbId,
        author_id: DbId,
        content: &str,
    ) -> Result<DiscussionReply, sqlx::Error> {
        let query = format!(
            "INSERT INTO discussion_replies (discussion_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {REPLY_COLUMNS}"
        );
        sqlx::query_as::<_, DiscussionReply>(&query)
            .bind(discussion_id)
            .bind(author_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// A discussion's replies, oldest first.
    pub async fn list_replies(
        pool: &PgPool,
        discussion_id: DbId,
    ) -> Result<Vec<DiscussionReply>, sqlx::Error> {
        let query = format!(
            "SELECT {REPLY_COLUMNS} FROM discussion_replies
             WHERE discussion_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, DiscussionReply>(&query)
            .bind(discussion_id)
            .fetch_all(pool)
            .await
    }
}
