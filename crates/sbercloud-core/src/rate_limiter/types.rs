//! Type definitions for rate limiting

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Token bucket configuration
///
/// # Examples
///
/// ```
/// use sbercloud_core::rate_limiter::RateLimitConfig;
///
/// // Ten requests per second, ten of which may fire at once
/// let config = RateLimitConfig::per_second(10);
/// assert_eq!(config.burst_size, 10);
///
/// let custom = RateLimitConfig::default()
///     .with_rps(2.5)
///     .with_burst_size(5);
/// assert!(custom.is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Steady-state refill rate in tokens per second
    pub requests_per_second: f64,

    /// Bucket capacity; this many requests may fire with no delay
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const DEFAULT_REQUESTS_PER_SECOND: f64 = 10.0;
const DEFAULT_BURST_SIZE: u32 = 10;

fn default_burst_size() -> u32 {
    DEFAULT_BURST_SIZE
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            burst_size: default_burst_size(),
        }
    }
}

impl RateLimitConfig {
    /// Create a configuration with an explicit rate and burst
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// One second's worth of requests as burst, paced at `limit` per second
    pub fn per_second(limit: u32) -> Self {
        Self::new(f64::from(limit), limit)
    }

    /// Set requests per second
    pub fn with_rps(mut self, rps: f64) -> Self {
        self.requests_per_second = rps;
        self
    }

    /// Set burst size
    pub fn with_burst_size(mut self, size: u32) -> Self {
        self.burst_size = size;
        self
    }

    /// A bucket only limits anything with a finite positive rate and room
    /// for at least one token.
    pub fn is_enabled(&self) -> bool {
        self.requests_per_second.is_finite()
            && self.requests_per_second > 0.0
            && self.burst_size > 0
    }
}

/// Mutable bucket accounting, guarded by the limiter's lock
#[derive(Debug)]
pub(super) struct BucketState {
    /// Tokens currently in the bucket; negative while reservations are queued
    pub tokens: f64,
    /// Last time `tokens` was brought up to date
    pub last: Instant,
    /// Time the most recent reservation becomes usable
    pub last_event: Instant,
}

impl BucketState {
    /// A full bucket as of now
    pub fn new(initial_tokens: f64) -> Self {
        let now = Instant::now();
        Self {
            tokens: initial_tokens,
            last: now,
            last_event: now,
        }
    }
}

/// A token promised to one caller, usable from `time_to_act`
#[derive(Debug, Clone, Copy)]
pub(super) struct Reservation {
    pub time_to_act: Instant,
}
