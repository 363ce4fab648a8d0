//! Client library for the Shwary mobile-money payment API.
//!
//! Payments are validated against per-country rules before any request is
//! sent, transient failures are retried with exponential backoff, and every
//! provider answer is mapped to a typed value or a [`ShwaryError`].
//!
//! [`Shwary`] serves blocking code, [`ShwaryAsync`] serves tokio code; both
//! share the same validation, retry and error-mapping behavior.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod payments;
pub mod resilience;

pub use client::{Shwary, ShwaryAsync};
pub use config::{load_config, ConfigError, ShwaryConfig};
pub use error::{ApiError, ErrorKind, Result, ShwaryError, TransportError};
pub use observability::{init_logging, install_global, LoggingError};
pub use payments::{
    CountryCode, CountryRule, CountryRules, PaymentResponse, PaymentStatus, TransactionResponse,
    WebhookPayload,
};
