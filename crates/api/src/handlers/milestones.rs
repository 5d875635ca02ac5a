//! Handlers for milestones: CRUD, the status state machine, and the
//! due-soon listing.
//!
//! Mutating endpoints run the full guard sequence in a fixed order:
//! authentication, rate limit, input sanitization, resource permission,
//! then the role gate. Each stage raises its own error kind and nothing
//! is written before all of them pass.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use projecthub_core::error::CoreError;
use projecthub_core::milestone_status::{check_transition, MilestoneStatus};
use projecthub_core::permissions::{check_milestone_action, MilestoneAction, MilestoneContext};
use projecthub_core::roles::{ROLE_ADMIN, ROLE_STUDENT, ROLE_SUPERVISOR};
use projecthub_core::types::DbId;
use projecthub_core::validation::validate_due_date;
use projecthub_db::models::milestone::{
    ChangeMilestoneStatus, CreateMilestone, Milestone, UpdateMilestone,
};
use projecthub_db::models::notification::KIND_MILESTONE_STATUS;
use projecthub_db::models::project::Project;
use projecthub_db::repositories::{
    DueMilestone, MilestoneRepo, NotificationRepo, ProfileRepo, ProjectRepo,
};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::input::{clean_optional, clean_required};
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::{self, OP_MILESTONE_READ, OP_MILESTONE_WRITE};
use crate::state::AppState;

/// POST /api/v1/projects/{id}/milestones
///
/// Create a milestone on a claimed project. Admins are excluded: they
/// administer the platform but do not take part in milestone work.
pub async fn create_milestone(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_WRITE).await?;
    input.validate()?;
    validate_due_date(input.due_date).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    input.title = clean_required(&input.title, "title")?;
    if let Some(description) = &input.description {
        input.description = Some(clean_optional(description, "description"));
    }

    let project = find_project(&state, project_id).await?;
    let ctx = milestone_context(&state, &auth_user, &project).await?;
    check_milestone_action(&auth_user.role, MilestoneAction::Write, ctx)?;

    // Role gate: runs last so a permission failure is reported first.
    if auth_user.role == ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin accounts cannot create milestones".into(),
        )));
    }

    let milestone = MilestoneRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(milestone_id = milestone.id, project_id, "Created milestone");
    Ok((StatusCode::CREATED, Json(milestone)))
}

/// GET /api/v1/projects/{id}/milestones
pub async fn list_milestones(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Milestone>>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_READ).await?;

    let project = find_project(&state, project_id).await?;
    let ctx = milestone_context(&state, &auth_user, &project).await?;
    check_milestone_action(&auth_user.role, MilestoneAction::Read, ctx)?;

    let milestones = MilestoneRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(milestones))
}

/// GET /api/v1/milestones/{id}
pub async fn get_milestone(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Milestone>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_READ).await?;

    let (milestone, project) = find_milestone_with_project(&state, id).await?;
    let ctx = milestone_context(&state, &auth_user, &project).await?;
    check_milestone_action(&auth_user.role, MilestoneAction::Read, ctx)?;

    Ok(Json(milestone))
}

/// PATCH /api/v1/milestones/{id}
///
/// Update milestone fields. Status is deliberately absent from the DTO;
/// it moves only through the status endpoint below.
pub async fn update_milestone(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateMilestone>,
) -> AppResult<Json<Milestone>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_WRITE).await?;
    input.validate()?;
    if let Some(due_date) = input.due_date {
        validate_due_date(due_date).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    if let Some(title) = &input.title {
        input.title = Some(clean_required(title, "title")?);
    }
    if let Some(description) = &input.description {
        input.description = Some(clean_optional(description, "description"));
    }

    let (_, project) = find_milestone_with_project(&state, id).await?;
    let ctx = milestone_context(&state, &auth_user, &project).await?;
    check_milestone_action(&auth_user.role, MilestoneAction::Write, ctx)?;

    let milestone = MilestoneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "milestone",
            id,
        }))?;
    Ok(Json(milestone))
}

/// PATCH /api/v1/milestones/{id}/status
///
/// Move a milestone through the status state machine. A move to
/// `blocked` requires a blocking reason; any other target clears it.
/// Admins may override the transition table.
pub async fn change_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeMilestoneStatus>,
) -> AppResult<Json<Milestone>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_WRITE).await?;
    input.validate()?;

    let to: MilestoneStatus = input
        .status
        .parse()
        .map_err(|_| AppError::Core(CoreError::Validation(format!(
            "Unknown milestone status '{}'",
            input.status
        ))))?;

    let blocking_reason = if to == MilestoneStatus::Blocked {
        let raw = input.blocking_reason.as_deref().unwrap_or("");
        Some(clean_required(raw, "blocking_reason")?)
    } else {
        None
    };

    let (milestone, project) = find_milestone_with_project(&state, id).await?;
    let ctx = milestone_context(&state, &auth_user, &project).await?;
    check_milestone_action(&auth_user.role, MilestoneAction::Write, ctx)?;

    let from: MilestoneStatus = milestone
        .status
        .parse()
        .map_err(|_| AppError::InternalError(format!("Corrupt status '{}'", milestone.status)))?;
    let admin_override = auth_user.role == ROLE_ADMIN;
    check_transition(Some(from), to, admin_override)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = MilestoneRepo::set_status(&state.pool, id, to.as_str(), blocking_reason.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "milestone",
            id,
        }))?;

    // Tell the owning student when someone else moved their milestone.
    if let Some(student_id) = project.student_id {
        if student_id != auth_user.user_id {
            NotificationRepo::create(
                &state.pool,
                student_id,
                KIND_MILESTONE_STATUS,
                &json!({
                    "milestone_id": updated.id,
                    "from": from.as_str(),
                    "to": updated.status,
                }),
            )
            .await?;
        }
    }

    tracing::info!(milestone_id = id, from = %from, to = %updated.status, "Milestone status changed");
    Ok(Json(updated))
}

/// DELETE /api/v1/milestones/{id}
///
/// Soft-delete a milestone. Supervisors cannot delete a student's work;
/// only the owning student or an admin may.
pub async fn delete_milestone(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_WRITE).await?;

    let (_, project) = find_milestone_with_project(&state, id).await?;
    let ctx = milestone_context(&state, &auth_user, &project).await?;
    check_milestone_action(&auth_user.role, MilestoneAction::Delete, ctx)?;

    if MilestoneRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "milestone",
            id,
        }))
    }
}

/// GET /api/v1/milestones/due-soon
///
/// Milestones whose reminder window has opened, scoped to the caller:
/// students see their own, supervisors their students', admins all.
pub async fn list_due_soon(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<DueMilestone>>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_MILESTONE_READ).await?;

    let all = MilestoneRepo::list_due_soon(&state.pool).await?;
    let scoped = match auth_user.role.as_str() {
        ROLE_ADMIN => all,
        ROLE_STUDENT => all
            .into_iter()
            .filter(|m| m.student_id == auth_user.user_id)
            .collect(),
        ROLE_SUPERVISOR => {
            let students = ProfileRepo::list_student_ids(&state.pool, auth_user.user_id).await?;
            all.into_iter()
                .filter(|m| students.contains(&m.student_id))
                .collect()
        }
        _ => Vec::new(),
    };
    Ok(Json(scoped))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id,
        }))
}

async fn find_milestone_with_project(
    state: &AppState,
    id: DbId,
) -> AppResult<(Milestone, Project)> {
    let milestone = MilestoneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "milestone",
            id,
        }))?;
    let project = find_project(state, milestone.project_id).await?;
    Ok((milestone, project))
}

/// Resolve the caller's relationship to the project's owning student.
async fn milestone_context(
    state: &AppState,
    auth_user: &AuthUser,
    project: &Project,
) -> AppResult<MilestoneContext> {
    let Some(student_id) = project.student_id else {
        return Err(AppError::Core(CoreError::Validation(
            "Project has no assigned student; milestones require a claimed project".into(),
        )));
    };

    let supervises_owner = if auth_user.role == ROLE_SUPERVISOR {
        ProfileRepo::supervises(&state.pool, auth_user.user_id, student_id).await?
    } else {
        false
    };

    Ok(MilestoneContext {
        is_owner: student_id == auth_user.user_id,
        supervises_owner,
    })
}
