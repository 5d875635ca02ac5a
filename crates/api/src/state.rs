use std::sync::Arc;

use projecthub_assistant::EmbeddingClient;
use projecthub_core::rate_limit::WindowLimiter;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: projecthub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-user-per-operation rate limiter.
    pub limiter: Arc<WindowLimiter>,
    /// Client for the embedding sidecar service.
    pub embedding: Arc<EmbeddingClient>,
}
