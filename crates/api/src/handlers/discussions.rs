//! Handlers for milestone discussion threads and replies.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use projecthub_core::error::CoreError;
use projecthub_core::permissions::{check_milestone_action, MilestoneAction, MilestoneContext};
use projecthub_core::roles::ROLE_SUPERVISOR;
use projecthub_core::types::DbId;
use projecthub_db::models::discussion::{CreateDiscussionPost, DiscussionReply, MilestoneDiscussion};
use projecthub_db::models::notification::KIND_DISCUSSION_REPLY;
use projecthub_db::repositories::{
    DiscussionRepo, MilestoneRepo, NotificationRepo, ProfileRepo, ProjectRepo,
};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::input::clean_required;
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::{self, OP_DISCUSSION_WRITE};
use crate::state::AppState;

/// POST /api/v1/milestones/{id}/discussions
pub async fn create_discussion(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(milestone_id): Path<DbId>,
    Json(input): Json<CreateDiscussionPost>,
) -> AppResult<(StatusCode, Json<MilestoneDiscussion>)> {
    rate_limit::enforce(&state, auth_user.user_id, OP_DISCUSSION_WRITE).await?;
    input.validate()?;
    let content = clean_required(&input.content, "content")?;

    require_participant(&state, &auth_user, milestone_id).await?;

    let discussion =
        DiscussionRepo::create_discussion(&state.pool, milestone_id, auth_user.user_id, &content)
            .await?;
    Ok((StatusCode::CREATED, Json(discussion)))
}

/// GET /api/v1/milestones/{id}/discussions
pub async fn list_discussions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(milestone_id): Path<DbId>,
) -> AppResult<Json<Vec<MilestoneDiscussion>>> {
    require_participant(&state, &auth_user, milestone_id).await?;
    let discussions = DiscussionRepo::list_by_milestone(&state.pool, milestone_id).await?;
    Ok(Json(discussions))
}

/// POST /api/v1/discussions/{id}/replies
pub async fn create_reply(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(discussion_id): Path<DbId>,
    Json(input): Json<CreateDiscussionPost>,
) -> AppResult<(StatusCode, Json<DiscussionReply>)> {
    rate_limit::enforce(&state, auth_user.user_id, OP_DISCUSSION_WRITE).await?;
    input.validate()?;
    let content = clean_required(&input.content, "content")?;

    let discussion = DiscussionRepo::find_discussion(&state.pool, discussion_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "discussion",
            id: discussion_id,
        }))?;
    require_participant(&state, &auth_user, discussion.milestone_id).await?;

    let reply =
        DiscussionRepo::create_reply(&state.pool, discussion_id, auth_user.user_id, &content)
            .await?;

    // Notify the thread starter about replies from the other party.
    if discussion.author_id != auth_user.user_id {
        NotificationRepo::create(
            &state.pool,
            discussion.author_id,
            KIND_DISCUSSION_REPLY,
            &json!({
                "discussion_id": discussion.id,
                "milestone_id": discussion.milestone_id,
                "reply_id": reply.id,
            }),
        )
        .await?;
    }

    Ok((StatusCode::CREATED, Json(reply)))
}

/// GET /api/v1/discussions/{id}/replies
pub async fn list_replies(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(discussion_id): Path<DbId>,
) -> AppResult<Json<Vec<DiscussionReply>>> {
    let discussion = DiscussionRepo::find_discussion(&state.pool, discussion_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "discussion",
            id: discussion_id,
        }))?;
    require_participant(&state, &auth_user, discussion.milestone_id).await?;

    let replies = DiscussionRepo::list_replies(&state.pool, discussion_id).await?;
    Ok(Json(replies))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Discussions are between the milestone's student and their supervisor
/// (admins may read along). Reuses the milestone permission check with
/// the read action.
async fn require_participant(
    state: &AppState,
    auth_user: &AuthUser,
    milestone_id: DbId,
) -> AppResult<()> {
    let milestone = MilestoneRepo::find_by_id(&state.pool, milestone_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "milestone",
            id: milestone_id,
        }))?;
    let project = ProjectRepo::find_by_id(&state.pool, milestone.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: milestone.project_id,
        }))?;
    let Some(student_id) = project.student_id else {
        return Err(AppError::Core(CoreError::Validation(
            "Project has no assigned student".into(),
        )));
    };

    let supervises_owner = if auth_user.role == ROLE_SUPERVISOR {
        ProfileRepo::supervises(&state.pool, auth_user.user_id, student_id).await?
    } else {
        false
    };

    check_milestone_action(
        &auth_user.role,
        MilestoneAction::Read,
        MilestoneContext {
            is_owner: student_id == auth_user.user_id,
            supervises_owner,
        },
    )?;
    Ok(())
}
