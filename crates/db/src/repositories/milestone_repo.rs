//! Repository for the `milestones` table.

use projecthub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, description, status, priority, due_date, \
                       estimated_hours, actual_hours, blocking_reason, reminder_days_before, \
                       created_at, updated_at";

/// A milestone nearing its due date, joined with the owning student.
///
/// Produced by [`MilestoneRepo::list_due_soon`] for the reminder sweeper.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DueMilestone {
    pub id: DbId,
    pub title: String,
    pub due_date: Timestamp,
    pub student_id: DbId,
}

/// Provides CRUD operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Insert a new milestone for a project. The caller sanitizes the
    /// free-text fields in `input` first.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones
                (project_id, title, description, priority, due_date, estimated_hours, reminder_days_before)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .bind(input.reminder_days_before)
            .fetch_one(pool)
            .await
    }

    /// Find a milestone by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM milestones WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's milestones ordered by due date.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE project_id = $1 AND deleted_at IS NULL
             ORDER BY due_date ASC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update milestone fields. Only non-`None` fields are applied. The
    /// caller sanitizes the free-text fields in `input` first.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                due_date = COALESCE($5, due_date),
                estimated_hours = COALESCE($6, estimated_hours),
                actual_hours = COALESCE($7, actual_hours),
                reminder_days_before = COALESCE($8, reminder_days_before),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(input.reminder_days_before)
            .fetch_optional(pool)
            .await
    }

    /// Set the status column. The transition check happens in the handler;
    /// this only persists. `blocking_reason` is cleared unless the new
    /// status is `blocked`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        blocking_reason: Option<&str>,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                status = $2,
                blocking_reason = CASE WHEN $2 = 'blocked' THEN $3 ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(status)
            .bind(blocking_reason)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a milestone. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE milestones SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Milestones whose reminder window has opened: due within the row's
    /// `reminder_days_before` days, not yet finished, with the owning
    /// student attached.
    pub async fn list_due_soon(pool: &PgPool) -> Result<Vec<DueMilestone>, sqlx::Error> {
        sqlx::query_as::<_, DueMilestone>(
            "SELECT m.id, m.title, m.due_date, p.student_id
             FROM milestones m
             JOIN projects p ON p.id = m.project_id
             WHERE m.deleted_at IS NULL
               AND p.deleted_at IS NULL
               AND p.student_id IS NOT NULL
               AND m.reminder_days_before IS NOT NULL
               AND m.status NOT IN ('completed', 'cancelled')
               AND m.due_date BETWEEN NOW()
                   AND NOW() + make_interval(days => m.reminder_days_before)",
        )
        .fetch_all(pool)
        .await
    }

    /// Count soft-deleted rows older than `cutoff`. Backs the cleanup
    /// dry-run.
    pub async fn count_deleted_before(pool: &PgPool, cutoff: Timestamp) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM milestones WHERE deleted_at < $1")
                .bind(cutoff)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Permanently remove soft-deleted rows older than `cutoff`.
    pub async fn purge_deleted_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE deleted_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count milestones per status. Used by the admin stats endpoint.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT status, COUNT(*) FROM milestones
             WHERE deleted_at IS NULL
             GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }
}
