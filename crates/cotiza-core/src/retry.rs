//! Bounded retry policy with randomized delays.

use std::time::Duration;

/// Delay distribution applied between attempts (and between per-day
/// historical fetches).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Fixed delay. `Duration::ZERO` disables sleeping entirely.
    Fixed {
        /// Delay between attempts.
        delay: Duration,
    },
    /// Uniform random delay in `[min, max]`, resampled on every use.
    ///
    /// The upstream is a public web page; a spread-out delay avoids tight
    /// retry loops without the shared state an exponential policy needs.
    Uniform {
        /// Lower bound of the sampled delay.
        min: Duration,
        /// Upper bound of the sampled delay.
        max: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Uniform {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}

impl Backoff {
    /// Policy that never sleeps; used by tests and tight local setups.
    pub const fn none() -> Self {
        Self::Fixed {
            delay: Duration::ZERO,
        }
    }

    /// Sample the next delay.
    pub fn delay(self) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Uniform { min, max } => {
                if max <= min {
                    return min;
                }
                let spread_ms = (max - min).as_millis() as u64;
                min + Duration::from_millis(fastrand::u64(0..=spread_ms))
            }
        }
    }
}

/// Configuration for the fetcher's bounded retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per fetch, first try included.
    pub max_attempts: u32,
    /// Delay distribution between attempts.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    pub fn uniform(max_attempts: u32, min: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Uniform { min, max },
        }
    }

    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed { delay },
        }
    }

    /// Retry immediately, without sleeping. Test-friendly.
    pub const fn no_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::none(),
        }
    }
}
