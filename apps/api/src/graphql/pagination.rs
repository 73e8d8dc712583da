//! Shared pagination utilities for GraphQL resolvers
//!
//! This module provides constants and helpers for consistent pagination
//! across all list queries. Out-of-range values are rejected as validation
//! errors rather than silently clamped, so callers learn about bad inputs.

use crate::error::{ApiError, ApiResult};

/// Items per page when the client does not ask for a count
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Maximum items per page for any list query
pub const MAX_PAGE_SIZE: i32 = 100;

/// Validated page bounds ready to bind as LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Validate optional `first`/`offset` arguments into page bounds
///
/// # Errors
/// `ApiError::Validation` when `first` is outside `1..=MAX_PAGE_SIZE` or
/// `offset` is negative
pub fn page(first: Option<i32>, offset: Option<i32>) -> ApiResult<Page> {
    let first = first.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&first) {
        return Err(ApiError::validation(format!(
            "first must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, first
        )));
    }

    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::validation(format!(
            "offset must not be negative, got {}",
            offset
        )));
    }

    Ok(Page {
        limit: i64::from(first),
        offset: i64::from(offset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[test]
    fn test_page_defaults() {
        assert_eq!(
            page(None, None).unwrap(),
            Page {
                limit: 10,
                offset: 0
            }
        );
    }

    #[rstest]
    #[case(Some(1), None)]
    #[case(Some(100), None)]
    #[case(Some(25), Some(75))]
    #[case(None, Some(0))]
    fn test_page_accepts_valid_bounds(#[case] first: Option<i32>, #[case] offset: Option<i32>) {
        assert!(page(first, offset).is_ok());
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(Some(-1), None)]
    #[case(Some(101), None)]
    #[case(None, Some(-1))]
    fn test_page_rejects_out_of_range(#[case] first: Option<i32>, #[case] offset: Option<i32>) {
        assert_matches!(page(first, offset), Err(ApiError::Validation(_)));
    }
}
