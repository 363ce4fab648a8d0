//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! ApiRequest:
//!     → transport attempt (per-attempt timeout set on the HTTP client)
//!     → http::response (classify)
//!     → On failure: retries.rs (check if retryable, wait via backoff.rs, try again)
//!     → success value, or the last error once attempts run out
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Payment initiation is retried like lookups; the attempt cap bounds re-submission
//! - Jitter is available but off by default so the schedule is exact

pub mod backoff;
pub mod retries;

pub use retries::{execute, is_retryable, RetryPolicy, RetryState};
