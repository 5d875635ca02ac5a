//! Route definitions for the `/admin` resource (admin role only).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// GET  /users                   -> list_users
/// POST /users                   -> create_user (staff provisioning)
/// POST /users/{id}/deactivate   -> deactivate_user
/// POST /users/{id}/reactivate   -> reactivate_user
/// POST /cleanup                 -> cleanup
/// GET  /stats                   -> platform_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}/deactivate", post(admin::deactivate_user))
        .route("/users/{id}/reactivate", post(admin::reactivate_user))
        .route("/cleanup", post(admin::cleanup))
        .route("/stats", get(admin::platform_stats))
}
