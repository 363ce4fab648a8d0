//! Blocking client.

use futures::executor::block_on;
use tracing::Dispatch;

use crate::client::core::{ClientCore, GET_TRANSACTION, INITIATE_PAYMENT};
use crate::config::{ConfigError, ShwaryConfig};
use crate::error::Result;
use crate::http::transport::BlockingTransport;
use crate::payments::countries::CountryRules;
use crate::payments::types::{PaymentResponse, TransactionResponse};
use crate::resilience::retries::RetryPolicy;

/// Client for synchronous code.
///
/// Every call runs on the calling thread, including the waits between
/// retries. Do not use it from inside an async runtime; use
/// [`ShwaryAsync`](crate::ShwaryAsync) there.
///
/// The connection pool lives as long as the value: dropping it, or calling
/// [`close`](Self::close), releases it.
///
/// ```no_run
/// use shwary::{Shwary, ShwaryConfig};
///
/// let config = ShwaryConfig::new("550e8400-e29b-41d4-a716-446655440000", "sk_test")
///     .with_sandbox(true);
/// let client = Shwary::new(&config)?;
/// let payment = client.initiate_payment("DRC", 5000.0, "+243972345678", None)?;
/// println!("{} is {}", payment.id, payment.status);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Shwary {
    core: ClientCore,
    transport: BlockingTransport,
}

impl Shwary {
    pub fn new(config: &ShwaryConfig) -> std::result::Result<Self, ConfigError> {
        Self::build(config, None)
    }

    /// Like [`new`](Self::new), but every record this client emits, from
    /// creation to close, goes to `dispatch` instead of the default.
    pub fn with_logging(
        config: &ShwaryConfig,
        dispatch: Dispatch,
    ) -> std::result::Result<Self, ConfigError> {
        Self::build(config, Some(dispatch))
    }

    fn build(
        config: &ShwaryConfig,
        dispatch: Option<Dispatch>,
    ) -> std::result::Result<Self, ConfigError> {
        let (core, base_url) = ClientCore::new(config, dispatch)?;
        let transport = BlockingTransport::new(base_url, config.timeout())?;
        core.log_created("blocking");
        Ok(Self { core, transport })
    }

    /// Validate, then ask the customer's phone to confirm a payment.
    pub fn initiate_payment(
        &self,
        country: &str,
        amount: f64,
        phone_number: &str,
        callback_url: Option<&str>,
    ) -> Result<PaymentResponse> {
        block_on(self.core.call(&self.transport, INITIATE_PAYMENT, |core| {
            core.prepare_payment(country, amount, phone_number, callback_url)
        }))
    }

    /// Fetch the current state of a transaction.
    pub fn get_transaction(&self, transaction_id: &str) -> Result<TransactionResponse> {
        block_on(self.core.call(&self.transport, GET_TRANSACTION, |core| {
            core.prepare_transaction(transaction_id)
        }))
    }

    pub fn is_sandbox(&self) -> bool {
        self.core.is_sandbox()
    }

    pub fn country_rules(&self) -> &CountryRules {
        self.core.rules()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.core.policy()
    }

    /// End the session now instead of at end of scope.
    pub fn close(self) {}
}

impl Drop for Shwary {
    fn drop(&mut self) {
        self.core.log_closed("blocking");
    }
}
