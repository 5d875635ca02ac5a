//! Tests for the authentication and role-gate extractors, driven through
//! a real router so rejections pass the full middleware stack.
//!
//! The pool is created lazily and never connected; none of these routes
//! touch the database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use projecthub_api::auth::jwt::{generate_access_token, JwtConfig};
use projecthub_api::config::ServerConfig;
use projecthub_api::middleware::error_envelope::stamp_error_envelope;
use projecthub_api::middleware::rbac::{DenyAdmin, RequireAdmin};
use projecthub_api::state::AppState;
use projecthub_assistant::EmbeddingClient;
use projecthub_core::rate_limit::WindowLimiter;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "guard-test-secret".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

fn test_state() -> AppState {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        production: false,
        email_domains: vec!["university.edu".to_string()],
        jwt: test_jwt_config(),
    };
    AppState {
        pool: PgPoolOptions::new().connect_lazy("postgres://localhost/unused").unwrap(),
        config: Arc::new(config),
        limiter: Arc::new(WindowLimiter::new()),
        embedding: Arc::new(EmbeddingClient::new("http://localhost:1")),
    }
}

fn app() -> Router {
    Router::new()
        .route("/admin-only", get(|_: RequireAdmin| async { "ok" }))
        .route("/no-admins", get(|_: DenyAdmin| async { "ok" }))
        .layer(middleware::from_fn(stamp_error_envelope))
        .with_state(test_state())
}

fn bearer(role: &str) -> String {
    let token = generate_access_token(1, role, &test_jwt_config()).unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_credentials_are_forbidden_with_stamped_envelope() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin-only")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "FORBIDDEN");
    assert_eq!(body["path"], "/admin-only");
    assert_eq!(body["method"], "GET");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin-only")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_rejected_from_admin_route() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin-only")
                .header("authorization", bearer("student"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_passes_admin_route() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin-only")
                .header("authorization", bearer("admin"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_rejected_from_participation_route() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/no-admins")
                .header("authorization", bearer("admin"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_passes_participation_route() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/no-admins")
                .header("authorization", bearer("student"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
