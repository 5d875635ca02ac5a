//! Fixed-window rate limiting keyed by user and operation.
//!
//! Each (user, operation) pair gets its own counting window. The first
//! request in a window records the window start; subsequent requests
//! increment the counter until the budget is spent, after which callers
//! receive the seconds remaining in the window as a `Retry-After` hint.
//!
//! State lives in-process behind a tokio `Mutex`, matching the
//! single-binary deployment model. Stale windows are swept lazily once the
//! map grows past a threshold, so idle users do not accumulate entries.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::types::DbId;

/// Sweep stale windows once the map holds this many entries.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Budget for one operation: `limit` requests per `window`.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    pub limit: u32,
    pub window: Duration,
}

impl Budget {
    pub const fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            window: Duration::from_secs(60),
        }
    }
}

/// In-process fixed-window rate limiter.
#[derive(Debug, Default)]
pub struct WindowLimiter {
    windows: Mutex<HashMap<(DbId, &'static str), Window>>,
}

impl WindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request for `user_id` against `operation`.
    ///
    /// Returns [`CoreError::RateLimited`] with a retry-after hint when the
    /// budget for the current window is exhausted.
    pub async fn check(
        &self,
        user_id: DbId,
        operation: &'static str,
        budget: Budget,
    ) -> Result<(), CoreError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < budget.window);
        }

        let window = windows.entry((user_id, operation)).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= budget.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= budget.limit {
            let elapsed = now.duration_since(window.started);
            let retry_after_secs = budget.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(CoreError::RateLimited {
                operation,
                retry_after_secs,
            });
        }

        window.count += 1;
        Ok(())
    }

    /// Number of live windows. Test hook.
    pub async fn window_count(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_requests_within_budget_pass() {
        let limiter = WindowLimiter::new();
        let budget = Budget::per_minute(3);
        for _ in 0..3 {
            assert!(limiter.check(1, "milestone_write", budget).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_exceeding_budget_returns_retry_after() {
        let limiter = WindowLimiter::new();
        let budget = Budget::per_minute(2);
        limiter.check(1, "milestone_write", budget).await.unwrap();
        limiter.check(1, "milestone_write", budget).await.unwrap();

        let err = limiter.check(1, "milestone_write", budget).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::RateLimited {
                operation: "milestone_write",
                retry_after_secs,
            } if retry_after_secs >= 1 && retry_after_secs <= 60
        );
    }

    #[tokio::test]
    async fn test_users_and_operations_are_isolated() {
        let limiter = WindowLimiter::new();
        let budget = Budget::per_minute(1);
        limiter.check(1, "milestone_write", budget).await.unwrap();

        // Different user, same operation.
        assert!(limiter.check(2, "milestone_write", budget).await.is_ok());
        // Same user, different operation.
        assert!(limiter.check(1, "milestone_read", budget).await.is_ok());
        // Same user, same operation: spent.
        assert!(limiter.check(1, "milestone_write", budget).await.is_err());
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let limiter = WindowLimiter::new();
        let budget = Budget {
            limit: 1,
            window: Duration::from_millis(20),
        };
        limiter.check(1, "chat", budget).await.unwrap();
        assert!(limiter.check(1, "chat", budget).await.is_err());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check(1, "chat", budget).await.is_ok());
    }
}
