//! Pagination window calculation
//!
//! Validates client-supplied offset/limit and clamps the result to the
//! snapshot length. An offset at or past the end yields an empty window
//! rather than an error, so a client can page until exhaustion without
//! special-casing the last page.

use crate::error::{AlarmError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page size policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLimits {
    /// Applied when the client omits `limit`
    pub default_limit: usize,
    /// Hard cap; larger requests are silently clamped, not rejected
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// Resolved window over a snapshot of `total` entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

impl PageWindow {
    /// Index range to materialize, already clamped to `[0, total]`
    pub fn range(&self) -> Range<usize> {
        let start = self.offset.min(self.total);
        let end = self.offset.saturating_add(self.limit).min(self.total);
        start..end
    }
}

/// Compute the page window for a snapshot of `total` entries
pub fn slice(total: usize, offset: Option<i64>, limit: Option<i64>, limits: &PageLimits) -> Result<PageWindow> {
    let offset = match offset {
        None => 0,
        Some(o) if o < 0 => {
            return Err(AlarmError::InvalidArgument(format!(
                "offset must be non-negative, got {o}"
            )))
        }
        Some(o) => o as usize,
    };

    let limit = match limit {
        None => limits.default_limit,
        Some(l) if l < 0 => {
            return Err(AlarmError::InvalidArgument(format!(
                "limit must be non-negative, got {l}"
            )))
        }
        Some(l) => (l as usize).min(limits.max_limit),
    };

    Ok(PageWindow {
        offset,
        limit,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let window = slice(500, None, None, &PageLimits::default()).unwrap();
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 100);
        assert_eq!(window.range(), 0..100);
    }

    #[test]
    fn test_negative_offset_rejected() {
        let err = slice(10, Some(-1), None, &PageLimits::default()).unwrap_err();
        assert!(matches!(err, AlarmError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_limit_rejected() {
        let err = slice(10, None, Some(-5), &PageLimits::default()).unwrap_err();
        assert!(matches!(err, AlarmError::InvalidArgument(_)));
    }

    #[test]
    fn test_oversized_limit_clamped_not_rejected() {
        let window = slice(5000, None, Some(99_999), &PageLimits::default()).unwrap();
        assert_eq!(window.limit, 1000);
        assert_eq!(window.range(), 0..1000);
    }

    #[test]
    fn test_offset_at_total_yields_empty_window() {
        let window = slice(10, Some(10), Some(10), &PageLimits::default()).unwrap();
        assert!(window.range().is_empty());
    }

    #[test]
    fn test_offset_past_total_yields_empty_window() {
        let window = slice(10, Some(500), Some(10), &PageLimits::default()).unwrap();
        assert!(window.range().is_empty());
    }

    #[test]
    fn test_window_clamped_to_total() {
        let window = slice(7, Some(5), Some(10), &PageLimits::default()).unwrap();
        assert_eq!(window.range(), 5..7);
    }
}
