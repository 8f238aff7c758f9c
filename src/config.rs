use std::time::Duration;

use crate::error::ErrorKind;
use crate::runtime::retry::{ActivityOptions, RetryPolicy};

/// Task queue the worker polls for RFQ workflows.
pub static TASK_QUEUE: &str = "structured-rfq";

/// Hard cap on client-requested price refreshes per RFQ.
pub const MAX_REFRESHES: u32 = 5;

/// How long the desk waits for a client response before the quote expires.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Validity window stamped on each indicative term sheet.
pub const TERM_SHEET_VALID_FOR: Duration = Duration::from_secs(60 * 60);

// === Per-step activity options ===
//
// One constant per workflow step. Timeouts are per attempt; the retry
// policy governs attempts. Non-retryable kinds short-circuit the policy.

/// Mapping is pure validation. A second attempt cannot succeed where the
/// first failed, so the policy allows exactly one.
pub const MAPPING: ActivityOptions = ActivityOptions {
    start_to_close_timeout: Duration::from_secs(30),
    retry: RetryPolicy {
        initial_interval: Duration::from_secs(1),
        backoff_coefficient: 1.0,
        maximum_interval: Duration::from_secs(1),
        maximum_attempts: 1,
        non_retryable: &[],
    },
    heartbeat_timeout: None,
};

pub const PRE_TRADE: ActivityOptions = ActivityOptions {
    start_to_close_timeout: Duration::from_secs(60),
    retry: RetryPolicy {
        initial_interval: Duration::from_secs(2),
        backoff_coefficient: 2.0,
        maximum_interval: Duration::from_secs(30),
        maximum_attempts: 3,
        non_retryable: &[],
    },
    heartbeat_timeout: None,
};

pub const PRICING: ActivityOptions = ActivityOptions {
    start_to_close_timeout: Duration::from_secs(5 * 60),
    retry: RetryPolicy {
        initial_interval: Duration::from_secs(5),
        backoff_coefficient: 2.0,
        maximum_interval: Duration::from_secs(60),
        maximum_attempts: 2,
        non_retryable: &[ErrorKind::Pricing, ErrorKind::Calibration],
    },
    heartbeat_timeout: Some(Duration::from_secs(30)),
};

pub const QUOTING: ActivityOptions = ActivityOptions {
    start_to_close_timeout: Duration::from_secs(60),
    retry: RetryPolicy {
        initial_interval: Duration::from_secs(2),
        backoff_coefficient: 2.0,
        maximum_interval: Duration::from_secs(60),
        maximum_attempts: 5,
        non_retryable: &[],
    },
    heartbeat_timeout: None,
};

pub const BOOKING: ActivityOptions = ActivityOptions {
    start_to_close_timeout: Duration::from_secs(60),
    retry: RetryPolicy {
        initial_interval: Duration::from_secs(2),
        backoff_coefficient: 2.0,
        maximum_interval: Duration::from_secs(10),
        maximum_attempts: 3,
        non_retryable: &[ErrorKind::Validation, ErrorKind::IllegalTransition],
    },
    heartbeat_timeout: None,
};

/// Confirmation delivery is best-effort at-least-once; the activity is
/// idempotent by trade id, so five attempts are safe.
pub const CONFIRMATION: ActivityOptions = ActivityOptions {
    start_to_close_timeout: Duration::from_secs(60),
    retry: RetryPolicy {
        initial_interval: Duration::from_secs(2),
        backoff_coefficient: 2.0,
        maximum_interval: Duration::from_secs(60),
        maximum_attempts: 5,
        non_retryable: &[],
    },
    heartbeat_timeout: None,
};
