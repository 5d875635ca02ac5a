//! Response middleware that guarantees the error envelope.
//!
//! `AppError::into_response` cannot see the request line, so the envelope
//! it builds lacks `path` and `method`; this layer fills them in. Error
//! responses produced outside `AppError` (the timeout layer, the panic
//! handler, axum's own rejections) carry no envelope at all, so the layer
//! wraps their body in one, coding the status via [`code_for_status`].
//! Success responses pass through untouched.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::error::code_for_status;

/// Upper bound on buffered error bodies. Envelopes are small; anything
/// larger is passed through unmodified.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub async fn stamp_error_envelope(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().to_string();

    let response = next.run(req).await;
    if !response.status().is_client_error() && !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            // Body exceeded the cap or failed to buffer; nothing to stamp.
            return Response::from_parts(parts, Body::empty());
        }
    };

    let stamped = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(mut value) if value.get("success") == Some(&serde_json::Value::Bool(false)) => {
            value["path"] = serde_json::Value::String(path);
            value["method"] = serde_json::Value::String(method);
            serde_json::to_vec(&value).unwrap_or_else(|_| bytes.to_vec())
        }
        _ => {
            // No envelope present; build one around whatever the body was.
            let message = match std::str::from_utf8(&bytes) {
                Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                _ => parts
                    .status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            };
            let envelope = json!({
                "success": false,
                "errorCode": code_for_status(parts.status),
                "message": message,
                "timestamp": Utc::now().to_rfc3339(),
                "path": path,
                "method": method,
            });
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            serde_json::to_vec(&envelope).unwrap_or_else(|_| bytes.to_vec())
        }
    };

    // The buffered length changed; let hyper recompute it.
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(stamped))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Json, Router};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route(
                "/boom",
                get(|| async {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({
                            "success": false,
                            "errorCode": "NOT_FOUND",
                            "message": "project with id 7 not found",
                            "timestamp": "2026-08-01T00:00:00Z",
                        })),
                    )
                }),
            )
            .route("/ok", get(|| async { Json(json!({ "success": true })) }))
            .route(
                "/bare",
                get(|| async { (StatusCode::REQUEST_TIMEOUT, "request timed out") }),
            )
            .layer(middleware::from_fn(stamp_error_envelope))
    }

    #[tokio::test]
    async fn test_error_envelope_gains_path_and_method() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/boom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["path"], "/boom");
        assert_eq!(body["method"], "GET");
        assert_eq!(body["errorCode"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bare_error_body_is_wrapped_in_envelope() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/bare")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["errorCode"], "REQUEST_TIMEOUT");
        assert_eq!(body["message"], "request timed out");
        assert_eq!(body["path"], "/bare");
        assert_eq!(body["method"], "GET");
    }

    #[tokio::test]
    async fn test_success_responses_pass_through() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("path").is_none());
    }
}
