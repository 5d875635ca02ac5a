//! Handlers for the `/bookmarks` resource. Students save catalogue
//! listings they are considering.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use projecthub_core::approval::APPROVAL_APPROVED;
use projecthub_core::error::CoreError;
use projecthub_core::types::DbId;
use projecthub_db::models::bookmark::{Bookmark, CreateBookmark};
use projecthub_db::repositories::{BookmarkRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStudent;
use crate::state::AppState;

/// GET /api/v1/bookmarks
pub async fn list_bookmarks(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> AppResult<Json<Vec<Bookmark>>> {
    let bookmarks = BookmarkRepo::list_by_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(bookmarks))
}

/// POST /api/v1/bookmarks
///
/// Save an approved listing. Bookmarking the same project twice trips
/// the unique constraint, which surfaces as 409.
pub async fn create_bookmark(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Json(input): Json<CreateBookmark>,
) -> AppResult<(StatusCode, Json<Bookmark>)> {
    let project = ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: input.project_id,
        }))?;
    if project.approval_status != APPROVAL_APPROVED {
        return Err(AppError::Core(CoreError::Validation(
            "Only approved projects can be bookmarked".into(),
        )));
    }

    let bookmark = BookmarkRepo::create(&state.pool, auth_user.user_id, input.project_id).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// DELETE /api/v1/bookmarks/{project_id}
pub async fn delete_bookmark(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Path(project_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if BookmarkRepo::delete(&state.pool, auth_user.user_id, project_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "bookmark",
            id: project_id,
        }))
    }
}
