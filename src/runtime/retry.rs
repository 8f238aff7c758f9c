use std::time::Duration;

use crate::error::ErrorKind;

/// Exponential backoff schedule for one activity step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the second attempt.
    pub initial_interval: Duration,
    /// Multiplier applied per additional failure.
    pub backoff_coefficient: f64,
    /// Ceiling on any single delay.
    pub maximum_interval: Duration,
    /// Total attempts, including the first.
    pub maximum_attempts: u32,
    /// Failure kinds that short-circuit the schedule.
    pub non_retryable: &'static [ErrorKind],
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            backoff_coefficient: 1.0,
            maximum_interval: Duration::from_secs(1),
            maximum_attempts: 1,
            non_retryable: &[],
        }
    }

    /// Whether another attempt is allowed after `completed_attempts`
    /// attempts have failed with `kind`.
    pub fn allows_retry(&self, kind: ErrorKind, completed_attempts: u32) -> bool {
        completed_attempts < self.maximum_attempts && !self.non_retryable.contains(&kind)
    }

    /// Delay to sleep after the `completed_attempts`-th failure
    /// (1-based): initial, then ×coefficient per failure, capped.
    pub fn backoff_after(&self, completed_attempts: u32) -> Duration {
        let exponent = completed_attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self
            .initial_interval
            .mul_f64(self.backoff_coefficient.powi(exponent));
        scaled.min(self.maximum_interval)
    }
}

/// Per-step execution bounds handed to the runtime alongside the
/// activity future.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityOptions {
    /// Wall-clock bound per attempt.
    pub start_to_close_timeout: Duration,
    pub retry: RetryPolicy,
    /// If set, the activity must heartbeat within this interval or the
    /// attempt is considered stuck and fails with a timeout.
    pub heartbeat_timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: RetryPolicy = RetryPolicy {
        initial_interval: Duration::from_secs(2),
        backoff_coefficient: 2.0,
        maximum_interval: Duration::from_secs(30),
        maximum_attempts: 5,
        non_retryable: &[ErrorKind::Validation],
    };

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(POLICY.backoff_after(1), Duration::from_secs(2));
        assert_eq!(POLICY.backoff_after(2), Duration::from_secs(4));
        assert_eq!(POLICY.backoff_after(3), Duration::from_secs(8));
        assert_eq!(POLICY.backoff_after(4), Duration::from_secs(16));
        assert_eq!(POLICY.backoff_after(5), Duration::from_secs(30));
        assert_eq!(POLICY.backoff_after(12), Duration::from_secs(30));
    }

    #[test]
    fn retries_stop_at_max_attempts() {
        assert!(POLICY.allows_retry(ErrorKind::TransientIo, 4));
        assert!(!POLICY.allows_retry(ErrorKind::TransientIo, 5));
    }

    #[test]
    fn non_retryable_kinds_short_circuit() {
        assert!(!POLICY.allows_retry(ErrorKind::Validation, 1));
        assert!(POLICY.allows_retry(ErrorKind::Timeout, 1));
    }

    #[test]
    fn none_policy_is_single_shot() {
        let policy = RetryPolicy::none();
        assert!(!policy.allows_retry(ErrorKind::TransientIo, 1));
    }
}
