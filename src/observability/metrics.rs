//! Client metrics.
//!
//! # Metrics
//! - `shwary_attempts_total` (counter): one per HTTP attempt, by operation and outcome
//! - `shwary_retries_total` (counter): retries scheduled, by operation and reason
//! - `shwary_calls_total` (counter): logical calls, by operation and final outcome
//! - `shwary_call_duration_seconds` (histogram): end-to-end call latency, waits included
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the application installs the exporter
//! - Labels are static strings, never user data

use std::time::Instant;

pub fn record_attempt(operation: &'static str, outcome: &'static str) {
    ::metrics::counter!(
        "shwary_attempts_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_retry(operation: &'static str, reason: &'static str) {
    ::metrics::counter!(
        "shwary_retries_total",
        "operation" => operation,
        "reason" => reason
    )
    .increment(1);
}

pub fn record_call(operation: &'static str, outcome: &'static str, started: Instant) {
    ::metrics::counter!(
        "shwary_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("shwary_call_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}
