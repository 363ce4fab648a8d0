//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failed attempt is worth repeating
//! - Compute the wait before the next attempt
//! - Drive attempts through a [`Transport`] until success, a terminal error, or the cap
//!
//! # Design Decisions
//! - Written once; the blocking and async clients differ only in their transport
//! - Transient failures only: timeouts, refused connections, 429 and 5xx
//! - A 429 waits one doubling step longer, or the provider's `Retry-After` if larger
//! - The last error is returned unchanged when attempts run out

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::RetryConfig;
use crate::error::{Result, ShwaryError, TransportErrorKind};
use crate::http::request::ApiRequest;
use crate::http::transport::Transport;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Attempt cap and wait schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter_ratio: config.jitter_ratio,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based) on the normal schedule.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        calculate_backoff(retry, self.base_delay, self.max_delay, self.jitter_ratio)
    }

    /// Wait after `error` ended attempt number `retry`.
    pub fn next_delay(&self, retry: u32, error: &ShwaryError) -> Duration {
        match error {
            ShwaryError::RateLimited { retry_after, .. } => {
                let stepped = self.delay_for_retry(retry.saturating_add(1));
                retry_after
                    .map_or(stepped, |hint| stepped.max(hint))
                    .min(self.max_delay)
            }
            _ => self.delay_for_retry(retry),
        }
    }
}

/// True for failures another attempt may fix.
pub fn is_retryable(error: &ShwaryError) -> bool {
    match error {
        ShwaryError::Transport(e) => matches!(
            e.kind(),
            TransportErrorKind::Timeout | TransportErrorKind::Connect
        ),
        ShwaryError::RateLimited { .. } => true,
        ShwaryError::Api(api) => api.is_server_error(),
        ShwaryError::Validation { .. }
        | ShwaryError::Authentication(_)
        | ShwaryError::InsufficientFunds(_) => false,
    }
}

/// Progress of one logical call. Never shared between calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryState {
    attempts: u32,
    waits: Vec<Duration>,
}

impl RetryState {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Waits taken so far, in order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    pub fn total_wait(&self) -> Duration {
        self.waits.iter().sum()
    }
}

/// Send `request` until it succeeds, fails terminally, or the cap is reached.
pub async fn execute<T, X>(
    transport: &X,
    policy: &RetryPolicy,
    request: &ApiRequest,
    operation: &'static str,
) -> (Result<T>, RetryState)
where
    T: DeserializeOwned + Send,
    X: Transport,
{
    let mut state = RetryState::default();

    loop {
        state.attempts += 1;
        tracing::debug!(
            attempt = state.attempts,
            method = %request.method,
            path = %request.path(),
            "Sending request"
        );

        let result = match transport.send(request).await {
            Ok(raw) => raw.into_result::<T>(),
            Err(e) => Err(ShwaryError::Transport(e)),
        };

        let error = match result {
            Ok(value) => {
                metrics::record_attempt(operation, "success");
                return (Ok(value), state);
            }
            Err(error) => error,
        };

        let outcome = error.outcome_label();
        metrics::record_attempt(operation, outcome);

        if !is_retryable(&error) {
            return (Err(error), state);
        }
        if state.attempts >= policy.max_attempts {
            tracing::warn!(
                attempts = state.attempts,
                error_kind = outcome,
                status = ?error.status(),
                "Retries exhausted"
            );
            return (Err(error), state);
        }

        let delay = policy.next_delay(state.attempts, &error);
        tracing::warn!(
            attempt = state.attempts,
            max_attempts = policy.max_attempts,
            delay = ?delay,
            error_kind = outcome,
            status = ?error.status(),
            "Retrying request"
        );
        metrics::record_retry(operation, outcome);
        state.waits.push(delay);
        transport.sleep(delay).await;
    }
}
