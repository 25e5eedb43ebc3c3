//! Generic bounded retry with cooperative cancellation.
//!
//! The cancellation token is checked before every attempt and raced against
//! every backoff sleep. With the default zero delay no waiting happens at all.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default attempt cap for catalog lookups.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Classifies an error as worth another attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each failed attempt.
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::ZERO,
            backoff_multiplier: 2,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            ..Default::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

/// Why [`retry_bounded`] gave up.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RetryError<E> {
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    #[error("{0}")]
    Terminal(E),
}

/// Run `operation` until it succeeds, fails terminally, runs out of attempts,
/// or `cancel` fires.
///
/// `operation` receives the 1-based attempt number.
pub async fn retry_bounded<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: Retryable + Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled {
                attempts: attempt - 1,
            });
        }

        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(RetryError::Terminal(e)),
            Err(e) => e,
        };

        if attempt == max_attempts {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: err,
            });
        }

        debug!(attempt, max_attempts, error = %err, "Transient failure, retrying");

        let delay = policy.delay_after(attempt);
        if !delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(RetryError::Cancelled { attempts: attempt });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    // The loop always returns on its last iteration.
    Err(RetryError::Cancelled {
        attempts: max_attempts,
    })
}
