//! Handlers for the `/projects` resource: the catalogue, proposal
//! submission, and the approval workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use projecthub_core::approval::{
    approval_successors, is_valid_approval_transition, validate_rejection_has_feedback,
    APPROVAL_APPROVED,
};
use projecthub_core::error::CoreError;
use projecthub_core::roles::{ROLE_ADMIN, ROLE_STUDENT};
use projecthub_core::types::DbId;
use projecthub_core::validation::normalize_tags;
use projecthub_db::models::notification::KIND_PROPOSAL_REVIEWED;
use projecthub_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use projecthub_db::repositories::{NotificationRepo, ProjectRepo};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::input::clean_required;
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::{self, OP_PROJECT_WRITE};
use crate::middleware::rbac::{RequireStudent, RequireSupervisor};
use crate::query::PaginationParams;
use crate::state::AppState;

/// Request body for `PATCH /projects/{id}/approval`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReviewProject {
    pub status: String,
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}

/// GET /api/v1/projects
///
/// Browse the catalogue. Students only ever see approved listings;
/// supervisors and admins may filter across approval states.
pub async fn list_projects(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut filter): Query<ProjectFilter>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<Project>>> {
    if auth_user.role == ROLE_STUDENT {
        filter.approval_status = Some(APPROVAL_APPROVED.to_string());
    }
    let projects = ProjectRepo::list(
        &state.pool,
        &filter,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = find_project(&state, id).await?;
    Ok(Json(project))
}

/// POST /api/v1/projects
///
/// Create a new listing owned by the calling supervisor. Starts in the
/// `pending` approval state.
pub async fn create_project(
    State(state): State<AppState>,
    RequireSupervisor(auth_user): RequireSupervisor,
    Json(mut input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    rate_limit::enforce(&state, auth_user.user_id, OP_PROJECT_WRITE).await?;
    input.validate()?;

    input.title = clean_required(&input.title, "title")?;
    input.abstract_text = clean_required(&input.abstract_text, "abstract_text")?;
    let tags = normalize_tags(&input.tags);
    let technologies = normalize_tags(&input.technologies);

    let project =
        ProjectRepo::create(&state.pool, auth_user.user_id, &input, &tags, &technologies).await?;
    tracing::info!(project_id = project.id, supervisor_id = auth_user.user_id, "Created project listing");
    Ok((StatusCode::CREATED, Json(project)))
}

/// PATCH /api/v1/projects/{id}
///
/// Update a listing. Supervisors may only touch their own; admins any.
pub async fn update_project(
    State(state): State<AppState>,
    RequireSupervisor(auth_user): RequireSupervisor,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_PROJECT_WRITE).await?;
    input.validate()?;

    let existing = find_project(&state, id).await?;
    require_listing_owner(&auth_user, &existing)?;

    if let Some(title) = &input.title {
        input.title = Some(clean_required(title, "title")?);
    }
    if let Some(abstract_text) = &input.abstract_text {
        input.abstract_text = Some(clean_required(abstract_text, "abstract_text")?);
    }
    let tags = input.tags.as_deref().map(normalize_tags);
    let technologies = input.technologies.as_deref().map(normalize_tags);

    let project = ProjectRepo::update(&state.pool, id, &input, tags.as_deref(), technologies.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id,
        }))?;
    Ok(Json(project))
}

/// POST /api/v1/projects/{id}/proposal
///
/// A student claims an approved listing as their FYP. First claim wins;
/// a claimed project conflicts. Claiming also creates the supervision
/// link between the listing's supervisor and the student.
pub async fn submit_proposal(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_PROJECT_WRITE).await?;

    let project = find_project(&state, id).await?;
    if project.approval_status != APPROVAL_APPROVED {
        return Err(AppError::Core(CoreError::Validation(
            "Only approved projects accept proposals".into(),
        )));
    }

    let claimed = ProjectRepo::claim_for_student(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project has already been claimed by another student".into(),
            ))
        })?;

    tracing::info!(project_id = id, student_id = auth_user.user_id, "Proposal submitted");
    Ok(Json(claimed))
}

/// PATCH /api/v1/projects/{id}/approval
///
/// Move a listing through the approval workflow. Rejection requires
/// feedback; admins may override the transition table.
pub async fn review_project(
    State(state): State<AppState>,
    RequireSupervisor(auth_user): RequireSupervisor,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewProject>,
) -> AppResult<Json<Project>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_PROJECT_WRITE).await?;
    input.validate()?;

    let existing = find_project(&state, id).await?;
    require_listing_owner(&auth_user, &existing)?;

    let admin_override = auth_user.role == ROLE_ADMIN;
    if !is_valid_approval_transition(&existing.approval_status, &input.status, admin_override) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot move project from '{}' to '{}'. Allowed: {}",
            existing.approval_status,
            input.status,
            approval_successors(&existing.approval_status).join(", ")
        ))));
    }

    let feedback = input
        .feedback
        .as_deref()
        .map(|f| clean_required(f, "feedback"))
        .transpose()?;
    validate_rejection_has_feedback(&input.status, feedback.as_deref())
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let project = ProjectRepo::set_approval_status(&state.pool, id, &input.status, feedback.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id,
        }))?;

    // Let the assigned student know the outcome where one exists.
    if let Some(student_id) = project.student_id {
        NotificationRepo::create(
            &state.pool,
            student_id,
            KIND_PROPOSAL_REVIEWED,
            &json!({
                "project_id": project.id,
                "status": project.approval_status,
                "feedback": project.review_feedback,
            }),
        )
        .await?;
    }

    tracing::info!(project_id = id, status = %project.approval_status, "Project reviewed");
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft-delete a listing. An admin cleanup pass purges it later.
pub async fn delete_project(
    State(state): State<AppState>,
    RequireSupervisor(auth_user): RequireSupervisor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    rate_limit::enforce(&state, auth_user.user_id, OP_PROJECT_WRITE).await?;

    let existing = find_project(&state, id).await?;
    require_listing_owner(&auth_user, &existing)?;

    if ProjectRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "project",
            id,
        }))
    }
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

/// Supervisors act only on their own listings; admins on any.
fn require_listing_owner(auth_user: &AuthUser, project: &Project) -> AppResult<()> {
    if auth_user.role != ROLE_ADMIN && project.supervisor_id != auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this project listing".into(),
        )));
    }
    Ok(())
}
