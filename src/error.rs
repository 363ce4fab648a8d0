//! Error taxonomy shared by both clients.
//!
//! Every fallible call returns [`ShwaryError`]. Callers that only care about
//! the broad category match on [`ShwaryError::kind`]; callers that need the
//! provider's answer read [`ShwaryError::response`].
//!
//! # Error Kinds
//! - `Validation`: input rejected, locally or by the provider (400)
//! - `Authentication`: credentials rejected (401/403)
//! - `InsufficientFunds`: business rejection by the provider (402, balance errors)
//! - `RateLimited`: provider throttling (429)
//! - `Api`: everything else, including transport failures

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ShwaryError>;

/// Broad error category, stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    InsufficientFunds,
    RateLimited,
    Api,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Api => "api",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong below HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The attempt exceeded the configured timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// Anything else (TLS, malformed response, body read failure).
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => f.write_str("timeout"),
            TransportErrorKind::Connect => f.write_str("connection"),
            TransportErrorKind::Other => f.write_str("transport"),
        }
    }
}

/// A failure of the HTTP transport itself; no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, error.to_string())
    }
}

/// A non-success answer from the provider, kept whole for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Provider message, or the raw text when the body was not JSON.
    pub message: String,
    /// Raw response body, exactly as received.
    pub body: String,
    /// Parsed body, when it was valid JSON.
    pub json: Option<serde_json::Value>,
}

impl ApiError {
    /// Canonical reason phrase for the status, `UNKNOWN` for non-standard codes.
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("UNKNOWN")
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Look up a top-level field of the JSON body.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.json.as_ref().and_then(|json| json.get(name))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shwary API error {} ({}): {}",
            self.status,
            self.reason(),
            self.message
        )
    }
}

/// Root error for every client operation.
#[must_use = "errors should be handled or propagated"]
#[derive(Debug, Error)]
pub enum ShwaryError {
    /// Input rejected before sending (`response` is `None`) or by the provider.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        response: Option<ApiError>,
    },

    /// Merchant credentials rejected.
    #[error("authentication failed: {}", .0.message)]
    Authentication(ApiError),

    /// Merchant balance too low or a business rule refused the payment.
    #[error("insufficient funds: {}", .0.message)]
    InsufficientFunds(ApiError),

    /// Provider throttling; `retry_after` mirrors the `Retry-After` header.
    #[error("rate limited: {}", .response.message)]
    RateLimited {
        response: ApiError,
        retry_after: Option<Duration>,
    },

    /// Any other provider error.
    #[error("{0}")]
    Api(ApiError),

    /// No usable response was received.
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
}

impl ShwaryError {
    /// Local validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        ShwaryError::Validation {
            message: message.into(),
            response: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ShwaryError::Validation { .. } => ErrorKind::Validation,
            ShwaryError::Authentication(_) => ErrorKind::Authentication,
            ShwaryError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            ShwaryError::RateLimited { .. } => ErrorKind::RateLimited,
            ShwaryError::Api(_) | ShwaryError::Transport(_) => ErrorKind::Api,
        }
    }

    /// The provider response behind this error, if one was received.
    pub fn response(&self) -> Option<&ApiError> {
        match self {
            ShwaryError::Validation { response, .. } => response.as_ref(),
            ShwaryError::Authentication(api)
            | ShwaryError::InsufficientFunds(api)
            | ShwaryError::Api(api) => Some(api),
            ShwaryError::RateLimited { response, .. } => Some(response),
            ShwaryError::Transport(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|api| api.status)
    }

    pub fn raw_body(&self) -> Option<&str> {
        self.response().map(|api| api.body.as_str())
    }

    /// True for failures detected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, ShwaryError::Validation { response: None, .. })
    }

    /// Label used for metrics and log fields.
    pub(crate) fn outcome_label(&self) -> &'static str {
        match self {
            ShwaryError::Transport(e) => match e.kind() {
                TransportErrorKind::Timeout => "timeout",
                TransportErrorKind::Connect => "connect",
                TransportErrorKind::Other => "transport",
            },
            other => other.kind().as_str(),
        }
    }
}
