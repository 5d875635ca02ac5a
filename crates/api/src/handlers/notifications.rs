//! Handlers for the `/notifications` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use projecthub_core::error::CoreError;
use projecthub_core::types::DbId;
use projecthub_db::models::notification::Notification;
use projecthub_db::repositories::NotificationRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Response body for `GET /notifications/unread-count`.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// Response body for `POST /notifications/read-all`.
#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: u64,
}

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = NotificationRepo::list_by_user(
        &state.pool,
        auth_user.user_id,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok(Json(notifications))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UnreadCount>> {
    let unread = NotificationRepo::unread_count(&state.pool, auth_user.user_id).await?;
    Ok(Json(UnreadCount { unread }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark one notification read. Scoped to the caller, so marking another
/// user's notification reads as not found.
pub async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NotificationRepo::mark_read(&state.pool, id, auth_user.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }))
    }
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<MarkedRead>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth_user.user_id).await?;
    Ok(Json(MarkedRead { marked }))
}
