//! Rate limit headers attached to GitHub API responses.

use std::time::{SystemTime, UNIX_EPOCH};

use http::HeaderMap;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate limit state reported by GitHub (`X-RateLimit-Limit`,
/// `X-RateLimit-Remaining`, `X-RateLimit-Reset`).
///
/// # Example
///
/// ```
/// use prchat::github::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit snapshot.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Reads the three rate limit headers, returning `None` unless all of
    /// them are present and numeric.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_number(headers, LIMIT_HEADER)?;
        let remaining = header_number(headers, REMAINING_HEADER)?;
        let reset_at = header_number(headers, RESET_HEADER)?;
        Some(Self::new(
            u32::try_from(limit).ok()?,
            u32::try_from(remaining).ok()?,
            reset_at,
        ))
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true when no requests remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds until the window resets, or zero if it already has.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.trim().parse().ok())
}
