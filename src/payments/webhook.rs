//! Webhook notification shape.
//!
//! The provider POSTs a JSON document to the merchant's callback URL when a
//! transaction changes state. Receiving the request is the integrator's job;
//! this module only decodes the body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Result, ShwaryError};
use crate::payments::types::PaymentStatus;

/// Body of a transaction status notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Transaction id.
    pub id: String,
    pub status: PaymentStatus,
    pub amount: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WebhookPayload {
    /// Decode a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| ShwaryError::validation(format!("invalid webhook payload: {e}")))
    }

    pub fn from_json(body: &str) -> Result<Self> {
        Self::from_slice(body.as_bytes())
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_decode_minimal_payload() {
        let payload =
            WebhookPayload::from_json(r#"{"id":"t-9","status":"completed","amount":5000}"#)
                .unwrap();
        assert_eq!(payload.id, "t-9");
        assert!(payload.is_completed());
        assert_eq!(payload.amount, Number::from(5000));
        assert!(payload.metadata.is_none());
    }

    #[test]
    fn test_extra_fields_and_unknown_status_are_kept() {
        let payload = WebhookPayload::from_slice(
            br#"{"id":"t-9","status":"expired","amount":1.5,"timestamp":"2025-02-06T10:30:45Z"}"#,
        )
        .unwrap();
        assert_eq!(payload.status.as_str(), "expired");
        assert_eq!(payload.extra["timestamp"], "2025-02-06T10:30:45Z");
    }

    #[test]
    fn test_reencoding_keeps_the_body() {
        let body = r#"{"id":"t-9","status":"completed","amount":5000,"metadata":{"orderId":"42"}}"#;
        let payload = WebhookPayload::from_json(body).unwrap();
        assert_eq!(serde_json::to_string(&payload).unwrap(), body);
    }

    #[test]
    fn test_malformed_payload_is_validation_error() {
        let err = WebhookPayload::from_json(r#"{"id":"t-9"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = WebhookPayload::from_slice(b"not json").unwrap_err();
        assert!(err.to_string().contains("invalid webhook payload"));
    }
}
