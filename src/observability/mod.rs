//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client calls produce:
//!     → logging.rs (structured events into the configured sink)
//!     → metrics.rs (counters, histograms)
//!     → redact.rs (masking applied to every field that could carry personal data)
//! ```
//!
//! # Design Decisions
//! - Every call runs in a span carrying operation, call id and target environment
//! - The merchant key, full phone numbers and amounts never reach a log record

pub mod logging;
pub mod metrics;
pub mod redact;

pub use logging::{init_logging, install_global, LoggingError};
