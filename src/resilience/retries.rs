//! Retry policy for upstream fetches.
//!
//! # Responsibilities
//! - Bound the number of attempts per fetch
//! - Bound each attempt with a deadline
//! - Space attempts with exponential backoff + jitter
//!
//! # Design Decisions
//! - Only GETs are issued upstream, so every failure is retryable
//! - The policy is plain data; the fetcher owns the loop

use std::time::Duration;

use crate::config::FetchConfig;
use crate::resilience::backoff::calculate_backoff;

/// Attempt budget and pacing for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// A policy that retries immediately, for tests and local tooling.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            attempt_timeout: Duration::from_secs(10),
        }
    }

    /// Attempts allowed, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before the attempt following `completed` failed attempts.
    pub fn delay_after(&self, completed: u32) -> Duration {
        calculate_backoff(completed, self.base_delay, self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
        }
    }
}
