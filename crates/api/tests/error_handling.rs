//! Tests for the error envelope produced by `AppError::into_response`.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use projecthub_api::error::{code_for_status, AppError};
use projecthub_core::error::CoreError;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_not_found_envelope() {
    let response = AppError::Core(CoreError::NotFound {
        entity: "project",
        id: 42,
    })
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCode"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("project"));
    // RFC 3339 timestamp.
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

#[tokio::test]
async fn test_rate_limited_sets_retry_after() {
    let response = AppError::Core(CoreError::RateLimited {
        operation: "assistant_chat",
        retry_after_secs: 42,
    })
    .into_response();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get("retry-after").unwrap(), "42");

    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "RATE_LIMITED");
    assert_eq!(body["details"]["retryAfterSecs"], 42);
}

#[tokio::test]
async fn test_field_validation_carries_details() {
    let mut fields = BTreeMap::new();
    fields.insert(
        "password".to_string(),
        vec!["Password must contain an uppercase letter".to_string()],
    );
    let response = AppError::Core(CoreError::FieldValidation(fields)).into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
    assert_eq!(
        body["details"]["validationErrors"]["password"][0],
        "Password must contain an uppercase letter"
    );
}

#[tokio::test]
async fn test_sqlx_row_not_found_maps_to_404() {
    let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "NOT_FOUND");
}

#[tokio::test]
async fn test_internal_error_keeps_message_outside_production() {
    // Production mode is never initialized in tests, so the development
    // default applies and internals pass through.
    let response = AppError::InternalError("pool exhausted".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "INTERNAL_ERROR");
    assert!(body["message"].as_str().unwrap().contains("pool exhausted"));
}

#[test]
fn test_unnamed_status_falls_back_to_unknown_error() {
    assert_eq!(code_for_status(StatusCode::IM_A_TEAPOT), "UNKNOWN_ERROR");
    assert_eq!(code_for_status(StatusCode::CONFLICT), "CONFLICT");
}
