//! Milestone status state machine.
//!
//! Statuses are stored as snake_case text in the `milestones.status` column
//! and validated against a fixed adjacency table on every status change.
//! The table is directed and deliberately not symmetric: a completed
//! milestone can be reopened into `InProgress` but can never move straight
//! to `Blocked`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    NotStarted,
    InProgress,
    Blocked,
    Completed,
    Cancelled,
}

use MilestoneStatus::*;

/// All statuses, in CHECK-constraint order.
pub const ALL_STATUSES: &[MilestoneStatus] =
    &[NotStarted, InProgress, Blocked, Completed, Cancelled];

impl MilestoneStatus {
    /// The snake_case column value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotStarted => "not_started",
            InProgress => "in_progress",
            Blocked => "blocked",
            Completed => "completed",
            Cancelled => "cancelled",
        }
    }

    /// Legal successor statuses for this status.
    pub fn successors(&self) -> &'static [MilestoneStatus] {
        match self {
            NotStarted => &[InProgress, Blocked, Cancelled],
            InProgress => &[Completed, Blocked, Cancelled, NotStarted],
            Blocked => &[InProgress, NotStarted, Cancelled],
            Completed => &[InProgress],
            Cancelled => &[NotStarted, InProgress],
        }
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(NotStarted),
            "in_progress" => Ok(InProgress),
            "blocked" => Ok(Blocked),
            "completed" => Ok(Completed),
            "cancelled" => Ok(Cancelled),
            other => Err(format!(
                "Invalid milestone status '{other}'. Must be one of: {}",
                ALL_STATUSES
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Whether moving `from` -> `to` is legal.
///
/// `admin_override` accepts any transition. A missing `from` means the
/// record is new and has no current status to constrain it, so any target
/// is accepted.
pub fn is_valid_transition(
    from: Option<MilestoneStatus>,
    to: MilestoneStatus,
    admin_override: bool,
) -> bool {
    if admin_override {
        return true;
    }
    match from {
        None => true,
        Some(from) => from.successors().contains(&to),
    }
}

/// Validate a transition, producing a message that names the legal
/// successors on failure.
pub fn check_transition(
    from: Option<MilestoneStatus>,
    to: MilestoneStatus,
    admin_override: bool,
) -> Result<(), String> {
    if is_valid_transition(from, to, admin_override) {
        return Ok(());
    }
    // `from` is always Some here: a None `from` never fails.
    let from = from.unwrap_or(to);
    Err(format!(
        "Cannot move milestone from '{from}' to '{to}'. Allowed: {}",
        from.successors()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_table_is_exact() {
        // Every pair not in the table must be rejected, every pair in it
        // accepted. Enumerating the full cross product pins the table down.
        for &from in ALL_STATUSES {
            for &to in ALL_STATUSES {
                let expected = from.successors().contains(&to);
                assert_eq!(
                    is_valid_transition(Some(from), to, false),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_reopening_completed_is_legal() {
        assert!(is_valid_transition(Some(Completed), InProgress, false));
    }

    #[test]
    fn test_completed_to_blocked_is_illegal() {
        assert!(!is_valid_transition(Some(Completed), Blocked, false));
    }

    #[test]
    fn test_self_transition_is_illegal() {
        for &status in ALL_STATUSES {
            assert!(!is_valid_transition(Some(status), status, false));
        }
    }

    #[test]
    fn test_admin_override_accepts_everything() {
        for &from in ALL_STATUSES {
            for &to in ALL_STATUSES {
                assert!(is_valid_transition(Some(from), to, true));
            }
        }
    }

    #[test]
    fn test_no_current_status_accepts_any_target() {
        for &to in ALL_STATUSES {
            assert!(is_valid_transition(None, to, false));
        }
    }

    #[test]
    fn test_check_transition_names_allowed_successors() {
        let err = check_transition(Some(Completed), Blocked, false).unwrap_err();
        assert!(err.contains("'completed'"));
        assert!(err.contains("in_progress"));
    }

    #[test]
    fn test_round_trip_parse() {
        for &status in ALL_STATUSES {
            assert_eq!(status.as_str().parse::<MilestoneStatus>(), Ok(status));
        }
        assert!("done".parse::<MilestoneStatus>().is_err());
    }
}
