//! Async client.

use std::sync::Arc;

use tracing::Dispatch;

use crate::client::core::{ClientCore, GET_TRANSACTION, INITIATE_PAYMENT};
use crate::config::{ConfigError, ShwaryConfig};
use crate::error::Result;
use crate::http::transport::ReqwestTransport;
use crate::payments::countries::CountryRules;
use crate::payments::types::{PaymentResponse, TransactionResponse};
use crate::resilience::retries::RetryPolicy;

/// Client for tokio-based code.
///
/// Cheap to clone; clones share the connection pool, the read-only
/// settings and the log dispatcher. Each call keeps its own retry state, so
/// concurrent calls never interfere. Waits between retries yield to the runtime.
///
/// ```no_run
/// use shwary::{ShwaryAsync, ShwaryConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ShwaryConfig::from_env()?;
/// let client = ShwaryAsync::new(&config)?;
/// let tx = client.get_transaction("c0fdfe50-24be-4de1-9f66-84608fd45a5f").await?;
/// println!("{} is {}", tx.id, tx.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShwaryAsync {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    core: ClientCore,
    transport: ReqwestTransport,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.core.log_closed("async");
    }
}

impl ShwaryAsync {
    pub fn new(config: &ShwaryConfig) -> std::result::Result<Self, ConfigError> {
        Self::build(config, None)
    }

    /// Like [`new`](Self::new), but every record emitted by this client and
    /// its clones goes to `dispatch` instead of the default.
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
        let transport = ReqwestTransport::new(base_url, config.timeout())?;
        core.log_created("async");
        Ok(Self {
            inner: Arc::new(Inner { core, transport }),
        })
    }

    /// Validate, then ask the customer's phone to confirm a payment.
    pub async fn initiate_payment(
        &self,
        country: &str,
        amount: f64,
        phone_number: &str,
        callback_url: Option<&str>,
    ) -> Result<PaymentResponse> {
        self.inner
            .core
            .call(&self.inner.transport, INITIATE_PAYMENT, |core| {
                core.prepare_payment(country, amount, phone_number, callback_url)
            })
            .await
    }

    /// Fetch the current state of a transaction.
    pub async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionResponse> {
        self.inner
            .core
            .call(&self.inner.transport, GET_TRANSACTION, |core| {
                core.prepare_transaction(transaction_id)
            })
            .await
    }

    pub fn is_sandbox(&self) -> bool {
        self.inner.core.is_sandbox()
    }

    pub fn country_rules(&self) -> &CountryRules {
        self.inner.core.rules()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.inner.core.policy()
    }

    /// Drop this handle. The pool is released with the last clone.
    pub fn close(self) {}
}
