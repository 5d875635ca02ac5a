//! Route definitions for `/milestones`. Project-scoped milestone routes
//! live under `/projects/{id}/milestones` (see `routes::projects`).

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::milestones;
use crate::state::AppState;

/// Milestone routes mounted at the API root.
///
/// ```text
/// GET    /milestones/due-soon     -> list_due_soon
/// GET    /milestones/{id}         -> get_milestone
/// PATCH  /milestones/{id}         -> update_milestone
/// DELETE /milestones/{id}         -> delete_milestone (soft)
/// PATCH  /milestones/{id}/status  -> change_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Registered before `{id}` so the literal segment wins.
        .route("/milestones/due-soon", get(milestones::list_due_soon))
        .route(
            "/milestones/{id}",
            get(milestones::get_milestone)
                .patch(milestones::update_milestone)
                .delete(milestones::delete_milestone),
        )
        .route("/milestones/{id}/status", patch(milestones::change_status))
}
