//! Sanitization front door for handler input.
//!
//! Thin wrappers over the core sanitizer that log a warning whenever the
//! cleanup changed the submitted text, so repeat offenders show up in the
//! traces with the field that tripped them.

use projecthub_core::error::CoreError;
use projecthub_core::sanitize::{sanitize_required, sanitize_text};

/// Sanitize a required free-text field, erroring when nothing survives.
pub fn clean_required(raw: &str, field: &'static str) -> Result<String, CoreError> {
    let outcome = sanitize_required(raw, field)?;
    if outcome.modified {
        tracing::warn!(field, "Sanitizer altered user input");
    }
    Ok(outcome.text)
}

/// Sanitize an optional free-text field. Empty results are kept as-is.
pub fn clean_optional(raw: &str, field: &'static str) -> String {
    let outcome = sanitize_text(raw);
    if outcome.modified {
        tracing::warn!(field, "Sanitizer altered user input");
    }
    outcome.text
}
