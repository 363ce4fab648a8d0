//! Call orchestration shared by both clients.
//!
//! # Responsibilities
//! - Hold what every call needs: country rules, auth headers, retry policy, target
//! - Validate input and build the wire request inside the call's span
//! - Run the retry loop over whichever transport the client owns
//! - Emit one summary log record and the call metrics per logical call
//!
//! # Design Decisions
//! - Each call gets its own span (`operation`, `call_id`, `sandbox`, masked merchant id)
//! - An injected dispatcher is fixed at construction and wins over the caller's
//!   default for every record the client emits, lifecycle records included
//! - Nothing mutable lives here; concurrent calls only share read-only state

use std::fmt;
use std::future::Future;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::{validate_config, ConfigError, FieldError, ShwaryConfig};
use crate::error::Result;
use crate::http::request::{build_payment_request, build_transaction_request, ApiRequest, AuthHeaders};
use crate::http::transport::Transport;
use crate::observability::metrics;
use crate::observability::redact::{MaskedId, MaskedPhone};
use crate::payments::countries::CountryRules;
use crate::payments::types::{PaymentResponse, PaymentStatus, TransactionResponse};
use crate::payments::validation::{validate_payment, validate_transaction_id};
use crate::resilience::retries::{execute, RetryPolicy};

pub(crate) const INITIATE_PAYMENT: &str = "initiate_payment";
pub(crate) const GET_TRANSACTION: &str = "get_transaction";

/// Fields logged when a call succeeds.
pub(crate) trait CallOutcome {
    fn transaction_id(&self) -> &str;
    fn status(&self) -> &PaymentStatus;
}

impl CallOutcome for PaymentResponse {
    fn transaction_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &PaymentStatus {
        &self.status
    }
}

impl CallOutcome for TransactionResponse {
    fn transaction_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &PaymentStatus {
        &self.status
    }
}

pub(crate) struct ClientCore {
    rules: CountryRules,
    auth: AuthHeaders,
    policy: RetryPolicy,
    sandbox: bool,
    merchant_id: String,
    dispatch: Option<Dispatch>,
}

impl fmt::Debug for ClientCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCore")
            .field("rules", &self.rules)
            .field("auth", &self.auth)
            .field("policy", &self.policy)
            .field("sandbox", &self.sandbox)
            .field("merchant_id", &MaskedId(&self.merchant_id).to_string())
            .field("dispatch", &self.dispatch.is_some())
            .finish()
    }
}

impl ClientCore {
    /// Validate `config` and precompute everything calls need.
    ///
    /// Records go to `dispatch` when given, otherwise to whatever default is
    /// active where each record is emitted.
    pub(crate) fn new(
        config: &ShwaryConfig,
        dispatch: Option<Dispatch>,
    ) -> std::result::Result<(Self, Url), ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::Validation(vec![FieldError {
                field: "base_url".to_string(),
                message: e.to_string(),
            }])
        })?;
        let merchant_id = config.merchant_id.trim().to_string();
        let auth = AuthHeaders::new(&merchant_id, &config.merchant_key)?;

        let core = Self {
            rules: config.country_rules(),
            auth,
            policy: RetryPolicy::from(&config.retry),
            sandbox: config.sandbox,
            merchant_id,
            dispatch,
        };
        Ok((core, base_url))
    }

    pub(crate) fn rules(&self) -> &CountryRules {
        &self.rules
    }

    pub(crate) fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    pub(crate) fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub(crate) fn prepare_payment(
        &self,
        country: &str,
        amount: f64,
        phone_number: &str,
        callback_url: Option<&str>,
    ) -> Result<ApiRequest> {
        let payment = validate_payment(&self.rules, country, amount, phone_number, callback_url)?;
        tracing::debug!(
            country = %payment.country(),
            phone = %MaskedPhone(payment.phone_number()),
            has_callback = payment.callback_url().is_some(),
            "Payment validated"
        );
        Ok(build_payment_request(&payment, &self.auth, self.sandbox))
    }

    pub(crate) fn prepare_transaction(&self, transaction_id: &str) -> Result<ApiRequest> {
        let transaction_id = validate_transaction_id(transaction_id)?;
        Ok(build_transaction_request(transaction_id, &self.auth))
    }

    /// Run one logical call: prepare, send with retries, log, record metrics.
    pub(crate) fn call<'a, T, X, P>(
        &'a self,
        transport: &'a X,
        operation: &'static str,
        prepare: P,
    ) -> impl Future<Output = Result<T>> + Send + 'a
    where
        T: DeserializeOwned + CallOutcome + Send + 'a,
        X: Transport,
        P: FnOnce(&ClientCore) -> Result<ApiRequest> + Send + 'a,
    {
        let dispatch = self
            .dispatch
            .clone()
            .unwrap_or_else(|| tracing::dispatcher::get_default(Dispatch::clone));
        let span = tracing::dispatcher::with_default(&dispatch, || {
            tracing::info_span!(
                "shwary_call",
                operation,
                call_id = %Uuid::new_v4(),
                sandbox = self.sandbox,
                merchant = %MaskedId(&self.merchant_id),
            )
        });

        async move {
            let started = Instant::now();

            let request = match prepare(self) {
                Ok(request) => request,
                Err(error) => {
                    tracing::warn!(error_kind = error.outcome_label(), "Call rejected before sending");
                    metrics::record_call(operation, error.outcome_label(), started);
                    return Err(error);
                }
            };

            let (result, state) = execute::<T, X>(transport, &self.policy, &request, operation).await;

            match &result {
                Ok(value) => {
                    tracing::info!(
                        transaction_id = %value.transaction_id(),
                        status = %value.status(),
                        attempts = state.attempts(),
                        waited = ?state.total_wait(),
                        "Call succeeded"
                    );
                    metrics::record_call(operation, "success", started);
                }
                Err(error) => {
                    tracing::warn!(
                        error_kind = error.outcome_label(),
                        status = ?error.status(),
                        attempts = state.attempts(),
                        waited = ?state.total_wait(),
                        "Call failed"
                    );
                    metrics::record_call(operation, error.outcome_label(), started);
                }
            }
            result
        }
        .instrument(span)
        .with_subscriber(dispatch)
    }

    fn emit(&self, record: impl FnOnce()) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, record),
            None => record(),
        }
    }

    pub(crate) fn log_created(&self, mode: &'static str) {
        self.emit(|| {
            tracing::info!(
                mode,
                sandbox = self.sandbox,
                merchant = %MaskedId(&self.merchant_id),
                "Client created"
            )
        });
    }

    pub(crate) fn log_closed(&self, mode: &'static str) {
        self.emit(|| {
            tracing::info!(
                mode,
                sandbox = self.sandbox,
                merchant = %MaskedId(&self.merchant_id),
                "Client closed"
            )
        });
    }
}
