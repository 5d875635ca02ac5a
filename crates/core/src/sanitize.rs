//! Free-text input sanitization.
//!
//! Applied to every user-supplied free-text field (milestone titles,
//! descriptions, blocking reasons, discussion content) before it reaches
//! the database. Strips markup and dangerous URI schemes rather than
//! escaping, because the platform never renders stored text as HTML.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

/// Result of sanitizing one text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOutcome {
    /// The cleaned text.
    pub text: String,
    /// Whether sanitization altered the input. Callers log a warning when
    /// this is set so repeated offenders show up in the traces.
    pub modified: bool,
}

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<[^>]*>").expect("static regex"))
}

fn uri_scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:javascript|data|vbscript):").expect("static regex"))
}

/// Sanitize a free-text field.
///
/// Removes HTML tags, script-capable URI schemes, and control characters
/// (newline and tab survive), then trims surrounding whitespace.
pub fn sanitize_text(input: &str) -> SanitizeOutcome {
    let stripped = html_tag_re().replace_all(input, "");
    let stripped = uri_scheme_re().replace_all(&stripped, "");
    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    let cleaned = cleaned.trim().to_string();

    SanitizeOutcome {
        modified: cleaned != input,
        text: cleaned,
    }
}

/// Sanitize a required field, rejecting input that is empty after cleanup.
///
/// `field` names the offending field in the error message.
pub fn sanitize_required(input: &str, field: &str) -> Result<SanitizeOutcome, CoreError> {
    let outcome = sanitize_text(input);
    if outcome.text.is_empty() {
        return Err(CoreError::Sanitization(format!(
            "Field '{field}' is empty after removing unsafe content"
        )));
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let outcome = sanitize_text("Implement the login flow");
        assert_eq!(outcome.text, "Implement the login flow");
        assert!(!outcome.modified);
    }

    #[test]
    fn test_html_tags_stripped() {
        let outcome = sanitize_text("<script>alert(1)</script>Weekly report");
        assert_eq!(outcome.text, "alert(1)Weekly report");
        assert!(outcome.modified);
    }

    #[test]
    fn test_uri_schemes_stripped() {
        let outcome = sanitize_text("see javascript:alert(1) and DATA:text/html");
        assert_eq!(outcome.text, "see alert(1) and text/html");
        assert!(outcome.modified);
    }

    #[test]
    fn test_control_characters_removed_newline_kept() {
        let outcome = sanitize_text("line one\nline two\x07");
        assert_eq!(outcome.text, "line one\nline two");
        assert!(outcome.modified);
    }

    #[test]
    fn test_trim_counts_as_modification() {
        let outcome = sanitize_text("  padded  ");
        assert_eq!(outcome.text, "padded");
        assert!(outcome.modified);
    }

    #[test]
    fn test_required_field_empty_after_cleanup_is_rejected() {
        let err = sanitize_required("<b></b>", "title").unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_required_field_with_content_passes() {
        let outcome = sanitize_required("<b>Design review</b>", "title").unwrap();
        assert_eq!(outcome.text, "Design review");
        assert!(outcome.modified);
    }
}
