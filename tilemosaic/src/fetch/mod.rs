//! Tile retrieval over the network.
//!
//! [`TileFetcher`] is the network boundary: it turns an address into raw
//! tile bytes, nothing more. No caching here; resolution against the disk
//! cache happens in the pipeline. Failures are classified transient or
//! permanent so the orchestrator can retry the former a bounded number of
//! times and skip the tile on the latter.

mod http;

pub use http::ReqwestFetcher;

use bytes::Bytes;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching a tile.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Timeouts, connection resets, 5xx responses. Worth retrying.
    #[error("transient fetch failure for {url}: {reason}")]
    Transient { url: String, reason: String },

    /// 4xx-equivalent responses. Retrying will not help.
    #[error("permanent fetch failure for {url}: {reason}")]
    Permanent { url: String, reason: String },

    /// The HTTP client itself could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    ClientConstruction(String),
}

impl FetchError {
    /// Shorthand for a transient failure.
    pub fn transient(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transient {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a permanent failure.
    pub fn permanent(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Permanent {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// True if a retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Network retrieval of a tile payload.
///
/// Implementations must be shareable across concurrent acquisitions.
pub trait TileFetcher: Send + Sync {
    /// Fetch the full payload at `address`.
    fn fetch(&self, address: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// How transient fetch failures are retried.
///
/// Applied per tile by the orchestrator; the fetcher itself never retries.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryPolicy {
    /// Fail on the first error.
    None,

    /// Constant delay between attempts.
    Fixed {
        /// Maximum attempts including the initial one.
        max_attempts: u32,
        /// Delay between attempts.
        delay: Duration,
    },

    /// Delay doubles after each failure, capped at `max_delay`.
    ExponentialBackoff {
        /// Maximum attempts including the initial one.
        max_attempts: u32,
        /// Delay after the first failure.
        initial_delay: Duration,
        /// Upper bound for the delay.
        max_delay: Duration,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3)
    }
}

impl RetryPolicy {
    /// Exponential backoff starting at 100ms, capped at 10s.
    pub fn exponential(max_attempts: u32) -> Self {
        Self::ExponentialBackoff {
            max_attempts,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Fixed-delay retries.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::Fixed {
            max_attempts,
            delay,
        }
    }

    /// Delay before the retry following failed attempt number `attempt`
    /// (1-based), or `None` when the budget is exhausted.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Fixed {
                max_attempts,
                delay,
            } => (attempt < *max_attempts).then_some(*delay),
            Self::ExponentialBackoff {
                max_attempts,
                initial_delay,
                max_delay,
            } => {
                if attempt >= *max_attempts {
                    return None;
                }
                let factor = 2f64.powi(attempt.saturating_sub(1) as i32);
                let delay_ms = initial_delay.as_millis() as f64 * factor;
                let capped = Duration::from_millis(delay_ms.min(max_delay.as_millis() as f64) as u64);
                Some(capped.min(*max_delay))
            }
        }
    }

    /// Maximum attempts including the initial one.
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::None => 1,
            Self::Fixed { max_attempts, .. } => *max_attempts,
            Self::ExponentialBackoff { max_attempts, .. } => *max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::transient("u", "timeout").is_transient());
        assert!(!FetchError::permanent("u", "404").is_transient());
        assert!(!FetchError::ClientConstruction("tls".into()).is_transient());
    }

    #[test]
    fn test_retry_none() {
        let policy = RetryPolicy::None;
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delay_for_attempt(1), None);
    }

    #[test]
    fn test_retry_fixed() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(50)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(50)));
        assert_eq!(policy.delay_for_attempt(3), None);
    }

    #[test]
    fn test_retry_exponential_doubles() {
        let policy = RetryPolicy::ExponentialBackoff {
            max_attempts: 4,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
        };
        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(200)));
        assert_eq!(policy.delay_for_attempt(3), Some(Duration::from_millis(400)));
        assert_eq!(policy.delay_for_attempt(4), None);
    }

    #[test]
    fn test_retry_exponential_caps_delay() {
        let policy = RetryPolicy::ExponentialBackoff {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
        };
        assert_eq!(policy.delay_for_attempt(6).unwrap(), Duration::from_secs(4));
    }

    #[test]
    fn test_default_policy_is_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
    }
}
