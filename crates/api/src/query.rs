//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Hard ceiling on page size.
const MAX_LIMIT: i64 = 100;
/// Default page size when the client sends none.
const DEFAULT_LIMIT: i64 = 20;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped limit in `1..=100`, defaulting to 20.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Non-negative offset, defaulting to 0.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams {
            limit: Some(9999),
            offset: Some(-5),
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.limit(), 1);
    }
}
