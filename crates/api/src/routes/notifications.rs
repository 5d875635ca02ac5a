//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Notification routes mounted at `/notifications`.
///
/// ```text
/// GET  /               -> list_notifications
/// GET  /unread-count   -> unread_count
/// POST /{id}/read      -> mark_read
/// POST /read-all       -> mark_all_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
}
