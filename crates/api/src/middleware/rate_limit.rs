//! Per-user-per-operation rate limit budgets.
//!
//! Handlers call [`enforce`] as the first guard stage after
//! authentication. Budgets are deliberately coarse: generous read limits,
//! tighter write limits, and a tight budget for assistant chat since each
//! chat fans out to the embedding sidecar.

use projecthub_core::rate_limit::Budget;
use projecthub_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

pub const OP_MILESTONE_READ: &str = "milestone_read";
pub const OP_MILESTONE_WRITE: &str = "milestone_write";
pub const OP_PROJECT_WRITE: &str = "project_write";
pub const OP_DISCUSSION_WRITE: &str = "discussion_write";
pub const OP_ASSISTANT_CHAT: &str = "assistant_chat";

/// Budget for an operation name.
pub fn budget_for(operation: &str) -> Budget {
    match operation {
        OP_MILESTONE_READ => Budget::per_minute(120),
        OP_ASSISTANT_CHAT => Budget::per_minute(10),
        // All other mutating operations share the write budget.
        _ => Budget::per_minute(30),
    }
}

/// Enforce the budget for one request. Maps an exhausted window to a 429
/// with a `Retry-After` hint via the error envelope.
pub async fn enforce(state: &AppState, user_id: DbId, operation: &'static str) -> AppResult<()> {
    state
        .limiter
        .check(user_id, operation, budget_for(operation))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_budget_is_tightest() {
        assert!(budget_for(OP_ASSISTANT_CHAT).limit < budget_for(OP_MILESTONE_WRITE).limit);
        assert!(budget_for(OP_MILESTONE_WRITE).limit < budget_for(OP_MILESTONE_READ).limit);
    }
}
