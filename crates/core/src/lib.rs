//! ProjectHub domain logic.
//!
//! Pure, I/O-free building blocks shared by the database and API layers:
//! the error taxonomy, role and status constants, the milestone status
//! state machine, input sanitization, field validation helpers, the
//! milestone permission model, and the rate-limit window counter.

pub mod approval;
pub mod error;
pub mod milestone_status;
pub mod permissions;
pub mod rate_limit;
pub mod roles;
pub mod sanitize;
pub mod types;
pub mod validation;
