//! Payment request and response types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::observability::redact::MaskedPhone;
use crate::payments::countries::CountryCode;

/// A payment that passed local validation.
///
/// Only [`validate_payment`](crate::payments::validate_payment) builds one, so
/// holding a `PaymentRequest` means the amount and phone number satisfy the
/// country's rules.
#[derive(Clone, PartialEq)]
pub struct PaymentRequest {
    country: CountryCode,
    currency: String,
    amount: f64,
    phone_number: String,
    callback_url: Option<String>,
}

impl PaymentRequest {
    pub(crate) fn new(
        country: CountryCode,
        currency: String,
        amount: f64,
        phone_number: String,
        callback_url: Option<String>,
    ) -> Self {
        Self {
            country,
            currency,
            amount,
            phone_number,
            callback_url,
        }
    }

    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Phone number in E.164 format.
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("country", &self.country)
            .field("currency", &self.currency)
            .field("amount", &"[redacted]")
            .field("phone_number", &MaskedPhone(&self.phone_number).to_string())
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Transaction status as reported by the provider.
///
/// The set is open: unknown values are kept verbatim in [`PaymentStatus::Other`]
/// and serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other(raw) => raw,
        }
    }

    /// Whether the transaction reached a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => PaymentStatus::Pending,
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(raw: &str) -> Self {
        PaymentStatus::from(raw.to_string())
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a successful payment initiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Opaque transaction id.
    pub id: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub is_sandbox: bool,
    /// Kept as the provider wrote it, so `5000` stays an integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Provider fields this version does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Point-in-time snapshot of a transaction, fetched by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub status: PaymentStatus,
    pub amount: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
