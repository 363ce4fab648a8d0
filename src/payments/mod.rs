//! Payment domain: country rules, validation, and the provider's data shapes.
//!
//! # Data Flow
//! ```text
//! caller input (country, amount, phone, callback?)
//!     → countries.rs (rule lookup)
//!     → validation.rs (amount floor, E.164 phone, callback URL)
//!     → PaymentRequest (validated, immutable)
//!     → http::request (wire request)
//!
//! provider response / webhook body
//!     → types.rs / webhook.rs (serde decoding)
//! ```

pub mod countries;
pub mod types;
pub mod validation;
pub mod webhook;

pub use countries::{CountryCode, CountryRule, CountryRules};
pub use types::{PaymentRequest, PaymentResponse, PaymentStatus, TransactionResponse};
pub use validation::validate_payment;
pub use webhook::WebhookPayload;
