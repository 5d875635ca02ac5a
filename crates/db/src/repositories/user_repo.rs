//! Repository for the `users` table.

use projecthub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::profile::{CreateStudentProfile, CreateSupervisorProfile};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, full_name, password_hash, role, is_active, \
                       last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, full_name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Insert a student account together with its profile.
    ///
    /// Runs in a transaction: a profile insert that trips a constraint
    /// (duplicate matric number) must not leave a stranded user row
    /// behind, or every retry would conflict on the email instead.
    pub async fn create_student(
        pool: &PgPool,
        input: &CreateUser,
        profile: &CreateStudentProfile,
    ) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, full_name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO student_profiles (user_id, matric_number, specialization, enrollment_year)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&profile.matric_number)
        .bind(&profile.specialization)
        .bind(profile.enrollment_year)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Insert a supervisor account together with its profile, in one
    /// transaction for the same reason as [`Self::create_student`].
    pub async fn create_supervisor(
        pool: &PgPool,
        input: &CreateUser,
        profile: &CreateSupervisorProfile,
    ) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, full_name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO supervisor_profiles (user_id, department, capacity)
             VALUES ($1, $2, $3)",
        )
        .bind(user.id)
        .bind(&profile.department)
        .bind(profile.capacity)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive, emails are stored lowercased).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users by page, most recently created first. `role` narrows to
    /// a single role when set.
    pub async fn list(
        pool: &PgPool,
        role: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::text IS NULL OR role = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a user. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reactivate a previously deactivated user.
    pub async fn reactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = true, updated_at = NOW()
             WHERE id = $1 AND is_active = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1 and return the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(pool: &PgPool, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Clear the failed-login state and stamp a successful login.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Count users per role. Used by the admin stats endpoint.
    pub async fn count_by_role(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role")
            .fetch_all(pool)
            .await
    }
}
