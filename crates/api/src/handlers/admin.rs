//! Handlers for the `/admin` resource: user administration, cleanup of
//! soft-deleted rows, and platform statistics.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use projecthub_core::error::CoreError;
use projecthub_core::roles::{validate_role, ROLE_SUPERVISOR};
use projecthub_core::types::DbId;
use projecthub_core::validation::{validate_password_strength, PasswordPolicy};
use projecthub_db::models::profile::CreateSupervisorProfile;
use projecthub_db::models::user::{CreateUser, UserResponse};
use projecthub_db::repositories::{MilestoneRepo, ProjectRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Request body for `POST /admin/users`. Staff provisioning; students
/// use self-signup instead.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,
    pub password: String,
    pub role: String,
    /// Required when `role` is `supervisor`.
    #[validate(nested)]
    pub supervisor_profile: Option<CreateSupervisorProfile>,
}

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
}

/// Request body for `POST /admin/cleanup`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CleanupRequest {
    /// Purge soft-deleted rows older than this many days.
    #[validate(range(min = 1, max = 3650))]
    pub older_than_days: i64,
    /// When set, report what would be purged without deleting anything.
    #[serde(default)]
    pub dry_run: bool,
}

/// Response body for `POST /admin/cleanup`.
#[derive(Debug, Serialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    pub projects: u64,
    pub milestones: u64,
    /// Expired or revoked sessions removed. Always 0 on a dry run.
    pub sessions: u64,
}

/// Response body for `GET /admin/stats`.
#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub users_by_role: BTreeMap<String, i64>,
    pub projects_by_approval: BTreeMap<String, i64>,
    pub milestones_by_status: BTreeMap<String, i64>,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<UserListParams>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    if let Some(role) = &params.role {
        validate_role(role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    let users = UserRepo::list(
        &state.pool,
        params.role.as_deref(),
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/admin/users
///
/// Provision a supervisor or admin account (students self-register).
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_role(&input.role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_password_strength(&input.password, &PasswordPolicy::default()).map_err(|problems| {
        AppError::Core(CoreError::FieldValidation(
            [("password".to_string(), problems)].into(),
        ))
    })?;
    if input.role == ROLE_SUPERVISOR && input.supervisor_profile.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Supervisor accounts require a supervisor_profile".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let new_user = CreateUser {
        email: input.email.to_lowercase(),
        full_name: input.full_name,
        password_hash,
        role: input.role,
    };
    let user = match &input.supervisor_profile {
        Some(profile) => UserRepo::create_supervisor(&state.pool, &new_user, profile).await?,
        None => UserRepo::create(&state.pool, &new_user).await?,
    };

    tracing::info!(user_id = user.id, admin_id = admin.user_id, role = %user.role, "Provisioned account");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/v1/admin/users/{id}/deactivate
///
/// Deactivate an account and revoke its sessions so outstanding refresh
/// tokens stop working immediately.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "user", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "Deactivated user");
    Ok(Json(user.into()))
}

/// POST /api/v1/admin/users/{id}/reactivate
pub async fn reactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    if !UserRepo::reactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "user", id }));
    }
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "Reactivated user");
    Ok(Json(user.into()))
}

/// POST /api/v1/admin/cleanup
///
/// Purge soft-deleted projects and milestones older than the cutoff, and
/// drop stale sessions. With `dry_run` the report carries the counts that
/// a real run would delete.
pub async fn cleanup(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CleanupRequest>,
) -> AppResult<Json<CleanupReport>> {
    input.validate()?;
    let cutoff = Utc::now() - chrono::Duration::days(input.older_than_days);

    let report = if input.dry_run {
        CleanupReport {
            dry_run: true,
            projects: ProjectRepo::count_deleted_before(&state.pool, cutoff).await? as u64,
            milestones: MilestoneRepo::count_deleted_before(&state.pool, cutoff).await? as u64,
            sessions: 0,
        }
    } else {
        // Milestones first: purging a project cascades to its milestones,
        // which would skew the reported counts.
        let milestones = MilestoneRepo::purge_deleted_before(&state.pool, cutoff).await?;
        let projects = ProjectRepo::purge_deleted_before(&state.pool, cutoff).await?;
        let sessions = SessionRepo::delete_stale(&state.pool).await?;
        CleanupReport {
            dry_run: false,
            projects,
            milestones,
            sessions,
        }
    };

    tracing::info!(
        admin_id = admin.user_id,
        dry_run = report.dry_run,
        projects = report.projects,
        milestones = report.milestones,
        "Cleanup run"
    );
    Ok(Json(report))
}

/// GET /api/v1/admin/stats
pub async fn platform_stats(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<PlatformStats>> {
    let users_by_role = UserRepo::count_by_role(&state.pool).await?.into_iter().collect();
    let projects_by_approval = ProjectRepo::count_by_approval_status(&state.pool)
        .await?
        .into_iter()
        .collect();
    let milestones_by_status = MilestoneRepo::count_by_status(&state.pool)
        .await?
        .into_iter()
        .collect();

    Ok(Json(PlatformStats {
        users_by_role,
        projects_by_approval,
        milestones_by_status,
    }))
}
