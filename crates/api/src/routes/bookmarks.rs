//! Route definitions for the `/bookmarks` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::bookmarks;
use crate::state::AppState;

/// Bookmark routes mounted at `/bookmarks`.
///
/// ```text
/// GET    /               -> list_bookmarks
/// POST   /               -> create_bookmark
/// DELETE /{project_id}   -> delete_bookmark
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark))
        .route("/{project_id}", delete(bookmarks::delete_bookmark))
}
