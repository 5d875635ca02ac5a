use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use projecthub_api::config::ServerConfig;
use projecthub_api::error::init_production_mode;
use projecthub_api::router::build_app_router;
use projecthub_api::state::AppState;
use projecthub_api::background;
use projecthub_assistant::EmbeddingClient;
use projecthub_core::rate_limit::WindowLimiter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "projecthub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    init_production_mode(config.production);
    tracing::info!(host = %config.host, port = %config.port, production = config.production, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = projecthub_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    projecthub_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    projecthub_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Embedding sidecar client ---
    let embedding = Arc::new(EmbeddingClient::from_env());
    match embedding.health().await {
        Ok(health) => {
            tracing::info!(model = %health.model, "Embedding service reachable");
        }
        Err(e) => {
            // The assistant degrades to an error response; everything else works.
            tracing::warn!(error = %e, "Embedding service unreachable at startup");
        }
    }

    // --- Due-date reminder sweeper ---
    let reminder_cancel = tokio_util::sync::CancellationToken::new();
    let reminder_handle = tokio::spawn(background::due_reminders::run(
        pool.clone(),
        reminder_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        limiter: Arc::new(WindowLimiter::new()),
        embedding,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    reminder_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), reminder_handle).await;
    tracing::info!("Due-date reminder job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
