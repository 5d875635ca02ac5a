//! Route definitions for the `/projects` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{milestones, projects};
use crate::state::AppState;

/// Project routes mounted at `/projects`.
///
/// ```text
/// GET    /                   -> list_projects
/// POST   /                   -> create_project (supervisor)
/// GET    /{id}               -> get_project
/// PATCH  /{id}               -> update_project
/// DELETE /{id}               -> delete_project (soft)
/// POST   /{id}/proposal      -> submit_proposal (student)
/// PATCH  /{id}/approval      -> review_project
/// GET    /{id}/milestones    -> list_milestones
/// POST   /{id}/milestones    -> create_milestone
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route(
            "/{id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/{id}/proposal", post(projects::submit_proposal))
        .route("/{id}/approval", patch(projects::review_project))
        .route(
            "/{id}/milestones",
            get(milestones::list_milestones).post(milestones::create_milestone),
        )
}
