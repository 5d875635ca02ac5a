//! Field validation helpers shared by DTO validation and the handlers.
//!
//! Everything here is pure logic: the API layer wires these into the
//! request path and translates failures into [`CoreError`] values.
//!
//! [`CoreError`]: crate::error::CoreError

use chrono::{Duration, Utc};

use crate::types::Timestamp;

/// Password strength policy.
///
/// Defaults require 8+ characters with at least one uppercase letter,
/// lowercase letter, digit, and special character.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

/// Validate a password against the policy.
///
/// Returns one message per unmet requirement, each naming the missing
/// category, so the client can render the full checklist at once.
pub fn validate_password_strength(password: &str, policy: &PasswordPolicy) -> Result<(), Vec<String>> {
    let mut failures = Vec::new();

    if password.chars().count() < policy.min_length {
        failures.push(format!(
            "Password must be at least {} characters long",
            policy.min_length
        ));
    }
    if policy.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
        failures.push("Password must contain an uppercase letter".to_string());
    }
    if policy.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
        failures.push("Password must contain a lowercase letter".to_string());
    }
    if policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        failures.push("Password must contain a digit".to_string());
    }
    if policy.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        failures.push("Password must contain a special character".to_string());
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

/// Default institutional email domains accepted at registration.
pub const DEFAULT_EMAIL_DOMAINS: &[&str] = &["university.edu", "student.university.edu"];

/// Check that an email belongs to one of the allowed institutional domains.
///
/// Matching is case-insensitive on the full domain part; subdomain
/// trickery like `evil-university.edu` does not match `university.edu`.
pub fn is_university_email(email: &str, allowed_domains: &[String]) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let domain = domain.to_ascii_lowercase();
    allowed_domains
        .iter()
        .any(|allowed| domain == allowed.to_ascii_lowercase())
}

/// Normalize a user-supplied tag list: trim, drop empties, lowercase,
/// dedup preserving first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Project specializations offered by the faculty.
pub const VALID_SPECIALIZATIONS: &[&str] = &[
    "software-engineering",
    "artificial-intelligence",
    "data-science",
    "cybersecurity",
    "networking",
    "human-computer-interaction",
];

/// Validate that a specialization is in the faculty whitelist.
pub fn validate_specialization(specialization: &str) -> Result<(), String> {
    if VALID_SPECIALIZATIONS.contains(&specialization) {
        Ok(())
    } else {
        Err(format!(
            "Invalid specialization '{specialization}'. Must be one of: {}",
            VALID_SPECIALIZATIONS.join(", ")
        ))
    }
}

/// Technologies a project listing may advertise.
///
/// Kept deliberately coarse; the catalogue filters on these, so free-form
/// entries would fragment search results.
pub const VALID_TECHNOLOGIES: &[&str] = &[
    "rust",
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "go",
    "react",
    "flutter",
    "postgresql",
    "mongodb",
    "tensorflow",
    "pytorch",
    "docker",
    "kubernetes",
    "aws",
    "unity",
];

/// Validate that every listed technology is in the platform whitelist.
///
/// Callers are expected to run the list through [`normalize_tags`] first,
/// so comparison here is exact.
pub fn validate_technologies(technologies: &[String]) -> Result<(), String> {
    let unknown: Vec<&str> = technologies
        .iter()
        .filter(|t| !VALID_TECHNOLOGIES.contains(&t.as_str()))
        .map(|t| t.as_str())
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Unknown technologies: {}. Must be one of: {}",
            unknown.join(", "),
            VALID_TECHNOLOGIES.join(", ")
        ))
    }
}

/// Maximum days into the future a milestone due date may be set.
///
/// Covers a full academic year including resit windows.
pub const MAX_DUE_DATE_HORIZON_DAYS: i64 = 365;

/// Validate that a milestone due date is in the future and within the
/// academic-year horizon.
pub fn validate_due_date(due_date: Timestamp) -> Result<(), String> {
    let now = Utc::now();
    if due_date <= now {
        return Err("Due date must be in the future".to_string());
    }
    if due_date > now + Duration::days(MAX_DUE_DATE_HORIZON_DAYS) {
        return Err(format!(
            "Due date must be within {MAX_DUE_DATE_HORIZON_DAYS} days from now"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(validate_password_strength("Str0ng-pass!", &policy()).is_ok());
    }

    #[test]
    fn test_each_missing_category_is_named() {
        let cases = [
            ("str0ng-pass!", "uppercase"),
            ("STR0NG-PASS!", "lowercase"),
            ("Strong-pass!", "digit"),
            ("Str0ngpass1", "special"),
            ("St0!p", "8 characters"),
        ];
        for (password, expected) in cases {
            let failures = validate_password_strength(password, &policy()).unwrap_err();
            assert!(
                failures.iter().any(|m| m.contains(expected)),
                "{password:?} should fail with a message naming {expected:?}, got {failures:?}"
            );
        }
    }

    #[test]
    fn test_all_categories_missing_all_reported() {
        let failures = validate_password_strength("", &policy()).unwrap_err();
        assert_eq!(failures.len(), 5);
    }

    fn domains() -> Vec<String> {
        DEFAULT_EMAIL_DOMAINS.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_university_email_accepted_case_insensitive() {
        assert!(is_university_email("alice@university.edu", &domains()));
        assert!(is_university_email("Bob@STUDENT.University.EDU", &domains()));
    }

    #[test]
    fn test_outside_domain_rejected() {
        assert!(!is_university_email("alice@gmail.com", &domains()));
        assert!(!is_university_email("alice@evil-university.edu", &domains()));
        assert!(!is_university_email("not-an-email", &domains()));
        assert!(!is_university_email("@university.edu", &domains()));
    }

    #[test]
    fn test_normalize_tags_trims_and_drops_empties() {
        let input = vec!["  ai  ".to_string(), "".to_string(), "web-app".to_string()];
        assert_eq!(normalize_tags(&input), vec!["ai", "web-app"]);
    }

    #[test]
    fn test_normalize_tags_dedups_preserving_order() {
        let input = vec!["Rust".to_string(), "ai".to_string(), "rust ".to_string()];
        assert_eq!(normalize_tags(&input), vec!["rust", "ai"]);
    }

    #[test]
    fn test_specialization_whitelist() {
        assert!(validate_specialization("data-science").is_ok());
        assert!(validate_specialization("astrology").is_err());
    }

    #[test]
    fn test_technology_whitelist() {
        let good = vec!["rust".to_string(), "postgresql".to_string()];
        assert!(validate_technologies(&good).is_ok());

        let bad = vec!["rust".to_string(), "cobol".to_string()];
        let err = validate_technologies(&bad).unwrap_err();
        assert!(err.contains("cobol"));
        assert!(!err.contains("Unknown technologies: rust"));
    }

    #[test]
    fn test_due_date_must_be_future_and_bounded() {
        let now = Utc::now();
        assert!(validate_due_date(now - Duration::days(1)).is_err());
        assert!(validate_due_date(now + Duration::days(30)).is_ok());
        assert!(validate_due_date(now + Duration::days(400)).is_err());
    }
}
