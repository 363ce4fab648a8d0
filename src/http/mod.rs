//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! PaymentRequest / transaction id
//!     → request.rs (route, auth headers, JSON body)
//!     → transport.rs (one attempt, async or blocking)
//!     → response.rs (decode 2xx, classify everything else)
//!     → typed value or ShwaryError
//! ```

pub mod request;
pub mod response;
pub mod transport;

pub use request::{build_payment_request, build_transaction_request, ApiRequest, AuthHeaders};
pub use response::{map_response, RawResponse};
pub use transport::{BlockingTransport, ReqwestTransport, Transport};
