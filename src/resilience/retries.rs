//! Retry logic for optimistic-concurrency conflicts.
//!
//! # Responsibilities
//! - Re-run an operation while it fails with a write conflict
//! - Sleep with backoff + jitter between attempts
//! - Stop immediately on any non-conflict error
//!
//! # Design Decisions
//! - Only conflicts are retryable; everything else is the caller's decision
//! - The operation is re-run as given: deciding what to send again belongs to the caller
//! - Exhaustion reports the last conflict together with the attempt count

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;
use tokio::time;

use crate::resilience::backoff::{calculate_backoff, Backoff};

/// Errors that can tell a write conflict apart from other failures.
pub trait Conflict {
    fn is_conflict(&self) -> bool;
}

/// Why [`retry_on_conflict`] gave up.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt conflicted.
    #[error("still conflicting after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    /// A non-conflict error stopped the retries.
    #[error("{0}")]
    Aborted(E),
}

/// Run `op` until it succeeds, fails with a non-conflict error, or the
/// backoff runs out of steps.
///
/// `op` receives the 1-based attempt number.
pub async fn retry_on_conflict<T, E, F, Fut>(
    backoff: &Backoff,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Conflict + Display,
{
    let steps = backoff.steps.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_conflict() => {
                if attempt >= steps {
                    return Err(RetryError::Exhausted { attempts: attempt, last: e });
                }

                let delay = calculate_backoff(attempt, backoff);
                tracing::warn!(
                    attempt,
                    max_attempts = steps,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Write conflict, retrying"
                );
                time::sleep(delay).await;
            }
            Err(e) => return Err(RetryError::Aborted(e)),
        }
    }
}
