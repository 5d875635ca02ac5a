use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the embedding sidecar responds on `/health`.
    pub embedding_healthy: bool,
}

/// GET /health -- returns service, database, and sidecar health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = projecthub_db::health_check(&state.pool).await.is_ok();
    let embedding_healthy = state.embedding.health().await.is_ok();

    // The assistant degrades gracefully without its sidecar; only the
    // database decides between ok and degraded.
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        embedding_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
