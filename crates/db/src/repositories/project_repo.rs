//! Repository for the `projects` table.

use projecthub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, abstract_text, specialization, difficulty, approval_status, \
                       review_feedback, supervisor_id, student_id, tags, technologies, \
                       created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `supervisor_id`. Tag and technology
    /// lists are expected to be normalized by the caller.
    pub async fn create(
        pool: &PgPool,
        supervisor_id: DbId,
        input: &CreateProject,
        tags: &[String],
        technologies: &[String],
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, abstract_text, specialization, difficulty, supervisor_id, tags, technologies)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.abstract_text)
            .bind(&input.specialization)
            .bind(input.difficulty)
            .bind(supervisor_id)
            .bind(tags)
            .bind(technologies)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filter, newest first, by page.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE deleted_at IS NULL
               AND ($1::text IS NULL OR specialization = $1)
               AND ($2::smallint IS NULL OR difficulty = $2)
               AND ($3::text IS NULL OR approval_status = $3)
               AND ($4::bigint IS NULL OR supervisor_id = $4)
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&filter.specialization)
            .bind(filter.difficulty)
            .bind(&filter.approval_status)
            .bind(filter.supervisor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All approved projects (id, title, abstract). Feeds the assistant's
    /// similarity ranking, so no pagination.
    pub async fn list_approved_summaries(
        pool: &PgPool,
    ) -> Result<Vec<(DbId, String, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, abstract_text FROM projects
             WHERE deleted_at IS NULL AND approval_status = 'approved'
             ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// `tags` and `technologies` replace the stored arrays when set.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
        tags: Option<&[String]>,
        technologies: Option<&[String]>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                abstract_text = COALESCE($3, abstract_text),
                specialization = COALESCE($4, specialization),
                difficulty = COALESCE($5, difficulty),
                tags = COALESCE($6, tags),
                technologies = COALESCE($7, technologies),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.abstract_text)
            .bind(&input.specialization)
            .bind(input.difficulty)
            .bind(tags)
            .bind(technologies)
            .fetch_optional(pool)
            .await
    }

    /// Set the approval status (and optional reviewer feedback).
    pub async fn set_approval_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        feedback: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                approval_status = $2,
                review_feedback = $3,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(status)
            .bind(feedback)
            .fetch_optional(pool)
            .await
    }

    /// Claim a project for a student (proposal submission) and record the
    /// supervision link in the same transaction. Fails softly when the
    /// project is already claimed: returns `None` without writing anything.
    pub async fn claim_for_student(
        pool: &PgPool,
        id: DbId,
        student_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET student_id = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL AND student_id IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO supervisor_students (supervisor_id, student_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(project.supervisor_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Soft-delete a project by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted project. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count soft-deleted rows older than `cutoff`. Backs the cleanup
    /// dry-run.
    pub async fn count_deleted_before(pool: &PgPool, cutoff: Timestamp) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE deleted_at < $1")
                .bind(cutoff)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Permanently remove soft-deleted rows older than `cutoff`. Returns
    /// the number of rows removed.
    pub async fn purge_deleted_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE deleted_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count projects per approval status. Used by the admin stats endpoint.
    pub async fn count_by_approval_status(
        pool: &PgPool,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT approval_status, COUNT(*) FROM projects
             WHERE deleted_at IS NULL
             GROUP BY approval_status ORDER BY approval_status",
        )
        .fetch_all(pool)
        .await
    }
}
