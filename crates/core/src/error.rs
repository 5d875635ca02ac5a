use std::collections::BTreeMap;

use crate::types::DbId;

/// Domain-level error taxonomy shared by all crates.
///
/// Each variant corresponds to one failure category in the guard pipeline
/// or the handlers. The API layer maps variants to HTTP statuses and error
/// codes; nothing here knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Aggregated per-field validation failures (field name -> messages).
    ///
    /// `BTreeMap` keeps the field ordering stable in serialized responses.
    #[error("Validation failed for {} field(s)", .0.len())]
    FieldValidation(BTreeMap<String, Vec<String>>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded for '{operation}': retry after {retry_after_secs}s")]
    RateLimited {
        operation: &'static str,
        retry_after_secs: u64,
    },

    #[error("Sanitization rejected input: {0}")]
    Sanitization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
