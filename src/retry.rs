//! # Retry Policy
//!
//! Bounded retry with an explicit backoff schedule.
//!
//! The policy is a value object: an ordered sequence of delays plus a
//! caller-supplied classifier deciding which failures are worth retrying.
//! The throttling schedule doubles from 1s to 16s, so a permanently
//! rate-limited operation is attempted 6 times in total before the final
//! failure surfaces.

use crate::error::TransportError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy with a fixed backoff schedule.
///
/// An operation is attempted once, then once more after each delay in the
/// schedule, as long as the classifier marks the failure retryable. Any
/// non-retryable failure surfaces immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl RetryPolicy {
    /// The throttling schedule: 1s, 2s, 4s, 8s, 16s.
    ///
    /// `delay(attempt) = 2^(attempt-1)` seconds for attempts 1..=5, giving
    /// up to 6 total attempts.
    #[must_use]
    pub fn throttling() -> Self {
        Self {
            delays: (0u32..5).map(|i| Duration::from_secs(1u64 << i)).collect(),
        }
    }

    /// Build a policy from an explicit delay schedule.
    ///
    /// An empty schedule means a single attempt with no retries.
    #[must_use]
    pub fn with_delays(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// Maximum total attempts, including the initial one.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }

    /// The backoff schedule.
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Run `operation`, retrying failures that `is_retryable` accepts until
    /// the schedule is exhausted.
    ///
    /// # Errors
    /// Returns the last failure once the schedule is exhausted, or the first
    /// non-retryable failure immediately.
    pub async fn run<T, Op, Fut>(
        &self,
        is_retryable: impl Fn(&TransportError) -> bool,
        mut operation: Op,
    ) -> Result<T, TransportError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut delays = self.delays.iter();
        let mut attempt = 1usize;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) => match delays.next() {
                    Some(delay) => {
                        warn!(
                            attempt,
                            delay_secs = delay.as_secs(),
                            "retryable vault failure, backing off: {err}"
                        );
                        tokio::time::sleep(*delay).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }
    }
}
