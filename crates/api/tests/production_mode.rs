//! Internal error messages must be suppressed in production.
//!
//! Lives in its own test binary: `init_production_mode` latches a
//! process-wide `OnceLock`, which would leak into the error tests that
//! rely on the development default.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use projecthub_api::error::{init_production_mode, AppError};
use projecthub_core::error::CoreError;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_internal_message_is_suppressed_in_production() {
    init_production_mode(true);

    let response = AppError::InternalError("DB down".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "INTERNAL_ERROR");
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_database_details_are_suppressed_in_production() {
    init_production_mode(true);

    let response =
        AppError::Database(sqlx::Error::Protocol("connection reset by peer".into()))
            .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(!body["message"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_client_errors_keep_their_message_in_production() {
    init_production_mode(true);

    let response = AppError::Core(CoreError::NotFound {
        entity: "project",
        id: 9,
    })
    .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "project with id 9 not found");
}
