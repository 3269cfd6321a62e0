//! Bounded retry for transient lock contention.

use crate::error::StorageError;
use backon::{BackoffBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub const MAX_ATTEMPTS: usize = 3;
pub const BASE_DELAY: Duration = Duration::from_millis(100);

/// Linear backoff: the delay after the n-th failed attempt is `base * n`.
#[derive(Debug, Clone, Copy)]
pub struct LinearBuilder {
    base: Duration,
    max_attempts: usize,
}

impl Default for LinearBuilder {
    fn default() -> Self {
        Self {
            base: BASE_DELAY,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl LinearBuilder {
    pub fn with_base_delay(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Total attempts, including the first one. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl BackoffBuilder for LinearBuilder {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff {
            base: self.base,
            max_attempts: self.max_attempts,
            attempt: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max_attempts: usize,
    attempt: usize,
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }
        Some(self.base * self.attempt as u32)
    }
}

/// Run `op`, retrying only on lock contention, within `policy`.
///
/// Returns the last error once attempts are exhausted; any other error is
/// returned immediately.
pub async fn retry_on_contention<T, F, Fut>(op: F, policy: LinearBuilder) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    let max_attempts = policy.max_attempts();
    let mut failed = 0usize;
    op.retry(policy)
        .when(StorageError::is_lock_contention)
        .notify(|err: &StorageError, dur: Duration| {
            failed += 1;
            warn!(
                attempt = failed,
                max_attempts,
                "{}, retrying in {:?}",
                err,
                dur
            );
        })
        .await
}
