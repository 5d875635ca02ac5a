//! Application-level error type and its mapping to HTTP responses.
//!
//! Every handler returns [`AppResult`]; failures funnel through
//! [`AppError::into_response`] to produce one consistent JSON envelope:
//!
//! ```json
//! { "success": false, "errorCode": "...", "message": "...",
//!   "details": { ... }, "timestamp": "..." }
//! ```
//!
//! The `path` and `method` fields are added by the response middleware
//! (see `middleware::error_envelope`), which is the only layer that can
//! see the request line.

use std::sync::OnceLock;

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use projecthub_core::error::CoreError;
use serde_json::json;

/// Whether internal error messages are suppressed in responses.
///
/// Set once at startup from `ServerConfig::production`; defaults to false
/// (development) when never initialized, so tests see full messages.
static PRODUCTION_MODE: OnceLock<bool> = OnceLock::new();

/// Initialize production mode. Later calls are ignored.
pub fn init_production_mode(production: bool) {
    let _ = PRODUCTION_MODE.set(production);
}

fn production_mode() -> bool {
    *PRODUCTION_MODE.get().unwrap_or(&false)
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `projecthub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Aggregated DTO validation failures from the `validator` crate.
    #[error("Request validation failed")]
    Validation(#[from] validator::ValidationErrors),

    /// An upstream failure from the embedding sidecar.
    #[error("Assistant unavailable: {0}")]
    Assistant(#[from] projecthub_assistant::EmbeddingClientError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Canonical error code for an HTTP status. Statuses without a well-known
/// name map to the literal `UNKNOWN_ERROR`.
pub fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::CONFLICT => "CONFLICT",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_ERROR",
        StatusCode::TOO_MANY_REQUESTS => "RATE_LIMITED",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::INTERNAL_SERVER_ERROR => "INTERNAL_ERROR",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        _ => "UNKNOWN_ERROR",
    }
}

/// Resolved pieces of one error response.
struct Mapped {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
    retry_after_secs: Option<u64>,
}

fn internal(message: String) -> Mapped {
    // Suppress internals in production; show them verbatim elsewhere.
    let message = if production_mode() {
        "Internal server error".to_string()
    } else {
        message
    };
    Mapped {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "INTERNAL_ERROR",
        message,
        details: None,
        retry_after_secs: None,
    }
}

fn map_core_error(core: &CoreError) -> Mapped {
    let plain = |status, code: &'static str, message: String| Mapped {
        status,
        code,
        message,
        details: None,
        retry_after_secs: None,
    };

    match core {
        CoreError::NotFound { entity, id } => plain(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            plain(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::FieldValidation(fields) => Mapped {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: "Request validation failed".to_string(),
            details: Some(json!({ "validationErrors": fields })),
            retry_after_secs: None,
        },
        CoreError::Conflict(msg) => plain(StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => {
            plain(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => plain(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::RateLimited {
            operation,
            retry_after_secs,
        } => Mapped {
            status: StatusCode::TOO_MANY_REQUESTS,
            code: "RATE_LIMITED",
            message: format!("Too many '{operation}' requests. Try again later."),
            details: Some(json!({ "retryAfterSecs": retry_after_secs })),
            retry_after_secs: Some(*retry_after_secs),
        },
        CoreError::Sanitization(msg) => {
            plain(StatusCode::BAD_REQUEST, "SANITIZATION_ERROR", msg.clone())
        }
        CoreError::Internal(msg) => internal(msg.clone()),
    }
}

/// Flatten `validator` output into a field -> messages map.
fn map_validator_errors(errors: &validator::ValidationErrors) -> Mapped {
    let mut fields = serde_json::Map::new();
    for (field, kinds) in errors.errors() {
        if let validator::ValidationErrorsKind::Field(list) = kinds {
            let messages: Vec<String> = list
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed constraint '{}'", e.code))
                })
                .collect();
            fields.insert(field.to_string(), json!(messages));
        }
    }
    Mapped {
        status: StatusCode::BAD_REQUEST,
        code: "VALIDATION_ERROR",
        message: "Request validation failed".to_string(),
        details: Some(json!({ "validationErrors": fields })),
        retry_after_secs: None,
    }
}

/// Classify a sqlx error.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Mapped {
    match err {
        sqlx::Error::RowNotFound => Mapped {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: "Resource not found".to_string(),
            details: None,
            retry_after_secs: None,
        },
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return Mapped {
                        status: StatusCode::CONFLICT,
                        code: "CONFLICT",
                        message: format!("Duplicate value violates unique constraint: {constraint}"),
                        details: None,
                        retry_after_secs: None,
                    };
                }
            }
            internal(format!("Database error: {db_err}"))
        }
        other => internal(format!("Database error: {other}")),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mapped = match &self {
            AppError::Core(core) => map_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Validation(errors) => map_validator_errors(errors),
            AppError::Assistant(err) => Mapped {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: "SERVICE_UNAVAILABLE",
                message: format!("Assistant unavailable: {err}"),
                details: None,
                retry_after_secs: None,
            },
            AppError::BadRequest(msg) => Mapped {
                status: StatusCode::BAD_REQUEST,
                code: "BAD_REQUEST",
                message: msg.clone(),
                details: None,
                retry_after_secs: None,
            },
            AppError::InternalError(msg) => internal(msg.clone()),
        };

        // Log level by status class: 5xx error, 4xx warn, rest debug.
        if mapped.status.is_server_error() {
            tracing::error!(status = %mapped.status, code = mapped.code, error = %self, "Request failed");
        } else if mapped.status.is_client_error() {
            tracing::warn!(status = %mapped.status, code = mapped.code, error = %self, "Request rejected");
        } else {
            tracing::debug!(status = %mapped.status, code = mapped.code, error = %self, "Request mapped to error");
        }

        let mut body = json!({
            "success": false,
            "errorCode": mapped.code,
            "message": mapped.message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let Some(details) = mapped.details {
            body["details"] = details;
        }

        let mut response = (mapped.status, axum::Json(body)).into_response();
        if let Some(secs) = mapped.retry_after_secs {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert("retry-after", value);
            }
        }
        response
    }
}
