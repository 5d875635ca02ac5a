//! Milestone permission model.
//!
//! Decides whether a caller may perform an action on a milestone, given
//! their role and relationship to the owning student. The API layer
//! resolves the relationship (ownership, supervision link) from the
//! database and calls [`check_milestone_action`] before mutating anything.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_STUDENT, ROLE_SUPERVISOR};

/// Actions a caller can attempt on a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneAction {
    Read,
    Write,
    Delete,
    ManageReminders,
}

impl MilestoneAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneAction::Read => "read",
            MilestoneAction::Write => "write",
            MilestoneAction::Delete => "delete",
            MilestoneAction::ManageReminders => "manage_reminders",
        }
    }
}

/// The caller's relationship to the milestone's owning student.
#[derive(Debug, Clone, Copy)]
pub struct MilestoneContext {
    /// Caller owns the milestone (is the project's student).
    pub is_owner: bool,
    /// Caller supervises the milestone's owning student.
    pub supervises_owner: bool,
}

/// Check whether `role` may perform `action` in the given context.
///
/// Students must own the milestone. Supervisors must hold the supervision
/// link and may never delete a student's milestone. Admins pass here;
/// endpoints that exclude admins enforce that separately at the route
/// level (see the API role gate).
pub fn check_milestone_action(
    role: &str,
    action: MilestoneAction,
    ctx: MilestoneContext,
) -> Result<(), CoreError> {
    let allowed = match role {
        ROLE_ADMIN => true,
        ROLE_STUDENT => ctx.is_owner,
        ROLE_SUPERVISOR => ctx.supervises_owner && action != MilestoneAction::Delete,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' may not {} this milestone",
            action.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MilestoneAction::*;

    const ALL_ACTIONS: &[MilestoneAction] = &[Read, Write, Delete, ManageReminders];

    fn ctx(is_owner: bool, supervises_owner: bool) -> MilestoneContext {
        MilestoneContext {
            is_owner,
            supervises_owner,
        }
    }

    #[test]
    fn test_student_owner_can_do_everything() {
        for &action in ALL_ACTIONS {
            assert!(check_milestone_action(ROLE_STUDENT, action, ctx(true, false)).is_ok());
        }
    }

    #[test]
    fn test_student_non_owner_is_forbidden() {
        for &action in ALL_ACTIONS {
            assert!(check_milestone_action(ROLE_STUDENT, action, ctx(false, false)).is_err());
        }
    }

    #[test]
    fn test_supervisor_with_link_cannot_delete() {
        assert!(check_milestone_action(ROLE_SUPERVISOR, Read, ctx(false, true)).is_ok());
        assert!(check_milestone_action(ROLE_SUPERVISOR, Write, ctx(false, true)).is_ok());
        assert!(check_milestone_action(ROLE_SUPERVISOR, ManageReminders, ctx(false, true)).is_ok());
        assert!(check_milestone_action(ROLE_SUPERVISOR, Delete, ctx(false, true)).is_err());
    }

    #[test]
    fn test_supervisor_without_link_is_forbidden() {
        for &action in ALL_ACTIONS {
            assert!(check_milestone_action(ROLE_SUPERVISOR, action, ctx(false, false)).is_err());
        }
    }

    #[test]
    fn test_admin_passes() {
        for &action in ALL_ACTIONS {
            assert!(check_milestone_action(ROLE_ADMIN, action, ctx(false, false)).is_ok());
        }
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        assert!(check_milestone_action("registrar", Read, ctx(true, true)).is_err());
    }
}
