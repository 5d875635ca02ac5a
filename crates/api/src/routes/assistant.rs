//! Route definitions for the `/assistant` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Assistant routes mounted at `/assistant`.
///
/// ```text
/// POST /chat                   -> chat
/// GET  /history                -> history
/// POST /messages/{id}/rating   -> rate_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(assistant::chat))
        .route("/history", get(assistant::history))
        .route("/messages/{id}/rating", post(assistant::rate_message))
}
