//! Repository for profile tables and the supervisor/student link.

use projecthub_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{StudentProfile, SupervisorProfile};

/// Provides operations on student/supervisor profiles and supervision links.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a student profile by user ID.
    pub async fn find_student(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<StudentProfile>, sqlx::Error> {
        sqlx::query_as::<_, StudentProfile>(
            "SELECT user_id, matric_number, specialization, enrollment_year
             FROM student_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Find a supervisor profile by user ID.
    pub async fn find_supervisor(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<SupervisorProfile>, sqlx::Error> {
        sqlx::query_as::<_, SupervisorProfile>(
            "SELECT user_id, department, capacity FROM supervisor_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Whether `supervisor_id` supervises `student_id`.
    pub async fn supervises(
        pool: &PgPool,
        supervisor_id: DbId,
        student_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM supervisor_students WHERE supervisor_id = $1 AND student_id = $2
             )",
        )
        .bind(supervisor_id)
        .bind(student_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Student user IDs assigned to a supervisor.
    pub async fn list_student_ids(
        pool: &PgPool,
        supervisor_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT student_id FROM supervisor_students
             WHERE supervisor_id = $1 ORDER BY student_id",
        )
        .bind(supervisor_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
