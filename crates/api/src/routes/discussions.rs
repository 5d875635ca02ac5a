//! Route definitions for discussion threads and replies.

use axum::routing::get;
use axum::Router;

use crate::handlers::discussions;
use crate::state::AppState;

/// Discussion routes mounted at the API root.
///
/// ```text
/// GET  /milestones/{id}/discussions  -> list_discussions
/// POST /milestones/{id}/discussions  -> create_discussion
/// GET  /discussions/{id}/replies     -> list_replies
/// POST /discussions/{id}/replies     -> create_reply
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/milestones/{id}/discussions",
            get(discussions::list_discussions).post(discussions::create_discussion),
        )
        .route(
            "/discussions/{id}/replies",
            get(discussions::list_replies).post(discussions::create_reply),
        )
}
