//! Client subsystem.
//!
//! # Data Flow
//! ```text
//! initiate_payment / get_transaction
//!     → core.rs (open call span, validate, build ApiRequest)
//!     → resilience::retries (attempts over the client's transport)
//!     → core.rs (summary log, metrics)
//!     → PaymentResponse / TransactionResponse or ShwaryError
//! ```
//!
//! # Design Decisions
//! - One orchestration path; `Shwary` and `ShwaryAsync` differ only in transport
//! - A client's lifetime is its session: construction opens the pool, drop closes it

mod async_client;
mod blocking;
mod core;

pub use async_client::ShwaryAsync;
pub use blocking::Shwary;
