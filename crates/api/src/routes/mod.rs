pub mod admin;
pub mod assistant;
pub mod auth;
pub mod bookmarks;
pub mod discussions;
pub mod health;
pub mod milestones;
pub mod notifications;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       student self-signup (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             own account
///
/// /projects                            list, create (supervisor)
/// /projects/{id}                       get, update, delete (soft)
/// /projects/{id}/proposal              claim listing (student, POST)
/// /projects/{id}/approval              approval workflow (PATCH)
/// /projects/{id}/milestones            list, create
///
/// /milestones/due-soon                 reminder-window listing
/// /milestones/{id}                     get, update, delete (soft)
/// /milestones/{id}/status              state machine (PATCH)
/// /milestones/{id}/discussions         list, create
/// /discussions/{id}/replies            list, create
///
/// /bookmarks                           list mine, add (student)
/// /bookmarks/{project_id}              remove
///
/// /notifications                       list
/// /notifications/unread-count          unread counter
/// /notifications/{id}/read             mark one read (POST)
/// /notifications/read-all              mark all read (POST)
///
/// /assistant/chat                      recommendation chat (POST)
/// /assistant/history                   conversation history
/// /assistant/messages/{id}/rating      rate a reply (POST)
///
/// /admin/users                         list, provision staff (admin only)
/// /admin/users/{id}/deactivate         deactivate + revoke sessions (POST)
/// /admin/users/{id}/reactivate         reactivate (POST)
/// /admin/cleanup                       purge soft-deleted rows (POST)
/// /admin/stats                         platform statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .merge(milestones::router())
        .merge(discussions::router())
        .nest("/bookmarks", bookmarks::router())
        .nest("/notifications", notifications::router())
        .nest("/assistant", assistant::router())
        .nest("/admin", admin::router())
}
