//! Project approval workflow constants and transition checks.
//!
//! A project proposal moves through a small review workflow. Values must
//! match the CHECK constraint on `projects.approval_status`.

/// Proposal is awaiting supervisor review.
pub const APPROVAL_PENDING: &str = "pending";

/// Proposal was accepted and is visible in the catalogue.
pub const APPROVAL_APPROVED: &str = "approved";

/// Proposal was rejected; the student may revise and resubmit.
pub const APPROVAL_REJECTED: &str = "rejected";

/// Project is retired from the catalogue.
pub const APPROVAL_ARCHIVED: &str = "archived";

/// All valid approval status values.
pub const VALID_APPROVAL_STATUSES: &[&str] = &[
    APPROVAL_PENDING,
    APPROVAL_APPROVED,
    APPROVAL_REJECTED,
    APPROVAL_ARCHIVED,
];

/// Validate that an approval status string is one of the accepted values.
pub fn validate_approval_status(status: &str) -> Result<(), String> {
    if VALID_APPROVAL_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid approval status '{status}'. Must be one of: {}",
            VALID_APPROVAL_STATUSES.join(", ")
        ))
    }
}

/// Legal successor statuses in the review workflow.
pub fn approval_successors(from: &str) -> &'static [&'static str] {
    match from {
        APPROVAL_PENDING => &[APPROVAL_APPROVED, APPROVAL_REJECTED],
        APPROVAL_APPROVED => &[APPROVAL_ARCHIVED],
        APPROVAL_REJECTED => &[APPROVAL_PENDING, APPROVAL_ARCHIVED],
        _ => &[],
    }
}

/// Whether moving `from` -> `to` is legal. Admins may override.
pub fn is_valid_approval_transition(from: &str, to: &str, admin_override: bool) -> bool {
    if admin_override {
        return VALID_APPROVAL_STATUSES.contains(&to);
    }
    approval_successors(from).contains(&to)
}

/// Validate that a rejection carries reviewer feedback.
///
/// Students need to know why a proposal was turned down, so a rejection
/// without a feedback note is refused outright.
pub fn validate_rejection_has_feedback(to: &str, feedback: Option<&str>) -> Result<(), String> {
    if to == APPROVAL_REJECTED && feedback.map_or(true, |f| f.trim().is_empty()) {
        return Err("A rejection must include non-empty feedback for the student".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_statuses_accepted() {
        for status in VALID_APPROVAL_STATUSES {
            assert!(validate_approval_status(status).is_ok());
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(validate_approval_status("draft").is_err());
    }

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        assert!(is_valid_approval_transition(APPROVAL_PENDING, APPROVAL_APPROVED, false));
        assert!(is_valid_approval_transition(APPROVAL_PENDING, APPROVAL_REJECTED, false));
    }

    #[test]
    fn test_approved_can_only_be_archived() {
        assert!(is_valid_approval_transition(APPROVAL_APPROVED, APPROVAL_ARCHIVED, false));
        assert!(!is_valid_approval_transition(APPROVAL_APPROVED, APPROVAL_PENDING, false));
        assert!(!is_valid_approval_transition(APPROVAL_APPROVED, APPROVAL_REJECTED, false));
    }

    #[test]
    fn test_archived_is_terminal() {
        for to in VALID_APPROVAL_STATUSES {
            assert!(!is_valid_approval_transition(APPROVAL_ARCHIVED, to, false));
        }
    }

    #[test]
    fn test_admin_override_still_requires_known_status() {
        assert!(is_valid_approval_transition(APPROVAL_ARCHIVED, APPROVAL_PENDING, true));
        assert!(!is_valid_approval_transition(APPROVAL_ARCHIVED, "draft", true));
    }

    #[test]
    fn test_rejection_requires_feedback() {
        assert!(validate_rejection_has_feedback(APPROVAL_REJECTED, None).is_err());
        assert!(validate_rejection_has_feedback(APPROVAL_REJECTED, Some("   ")).is_err());
        assert!(validate_rejection_has_feedback(APPROVAL_REJECTED, Some("scope too broad")).is_ok());
        assert!(validate_rejection_has_feedback(APPROVAL_APPROVED, None).is_ok());
    }
}
