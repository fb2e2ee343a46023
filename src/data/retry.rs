//! Retry policy for dataset fetches.
//!
//! The policy only decides; it never sleeps or performs I/O. The fetcher
//! asks it what to do after each failed attempt and does the waiting itself.

use crate::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, MAX_RETRY_DELAY};
use crate::data::error::FetchError;
use std::time::Duration;

/// Retry backoff strategy
#[derive(Clone, Debug, PartialEq)]
pub enum RetryStrategy {
    /// Same delay before every retry
    Fixed(Duration),
    /// Delay multiplies after each attempt, capped at `max_delay`
    Exponential {
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    },
}

/// What to do after a failed attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    RetryAfter(Duration),
    /// Give up and surface the error
    Fail,
}

/// Bounded retry policy
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    pub strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Create policy with fixed delay
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            strategy: RetryStrategy::Fixed(delay),
        }
    }

    /// Create policy with exponential backoff
    pub fn exponential(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            strategy: RetryStrategy::Exponential {
                initial_delay,
                max_delay: MAX_RETRY_DELAY,
                multiplier: 2.0,
            },
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Decide after `attempt` (1-based) failed with `error`.
    ///
    /// Only timeouts and connection failures are retried, and only while
    /// attempts remain.
    pub fn decide(&self, attempt: u32, error: &FetchError) -> RetryDecision {
        if !error.is_transient() || attempt >= self.max_attempts {
            return RetryDecision::Fail;
        }
        RetryDecision::RetryAfter(self.delay_for(attempt))
    }

    /// Delay to wait after the given failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match &self.strategy {
            RetryStrategy::Fixed(delay) => *delay,
            RetryStrategy::Exponential {
                initial_delay,
                max_delay,
                multiplier,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let millis = initial_delay.as_millis() as f64 * multiplier.powi(exponent);
                if !millis.is_finite() || millis >= max_delay.as_millis() as f64 {
                    *max_delay
                } else {
                    Duration::from_millis(millis as u64)
                }
            }
        }
    }
}
