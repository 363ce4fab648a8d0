//! Response classification.
//!
//! # Responsibilities
//! - Decode 2xx bodies into the expected type
//! - Map every other status to a [`ShwaryError`] variant
//! - Keep the raw body on every error for debugging
//!
//! # Design Decisions
//! - Classification is a pure function of status, body and `Retry-After`
//! - An undecodable 2xx body is an `Api` error, never a panic or a silent default

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result, ShwaryError};

const MAX_MESSAGE_CHARS: usize = 200;

/// What a transport hands back for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<Duration>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        map_response(self.status, &self.body, self.retry_after)
    }
}

/// `Retry-After` in delta-seconds form. HTTP dates are ignored.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Decode a success body or classify the failure.
pub fn map_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
    retry_after: Option<Duration>,
) -> Result<T> {
    let json: Option<Value> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| {
            ShwaryError::Api(ApiError {
                status,
                message: format!("response body could not be decoded: {e}"),
                body: body.to_string(),
                json,
            })
        });
    }

    let message = extract_message(status, body, json.as_ref());
    let insufficient = status == 400 && mentions_insufficient_funds(&message, json.as_ref());
    let error = ApiError {
        status,
        message,
        body: body.to_string(),
        json,
    };

    Err(match status {
        400 if insufficient => ShwaryError::InsufficientFunds(error),
        400 => ShwaryError::Validation {
            message: error.message.clone(),
            response: Some(error),
        },
        401 | 403 => ShwaryError::Authentication(error),
        402 => ShwaryError::InsufficientFunds(error),
        429 => ShwaryError::RateLimited {
            response: error,
            retry_after,
        },
        _ => ShwaryError::Api(error),
    })
}

fn extract_message(status: u16, body: &str, json: Option<&Value>) -> String {
    let from_json = json.and_then(|json| {
        ["message", "error"]
            .iter()
            .find_map(|field| json.get(field).and_then(message_text))
    });
    if let Some(message) = from_json {
        return message;
    }

    let text = body.trim();
    if text.is_empty() {
        return StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string();
    }
    truncate(text)
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn mentions_insufficient_funds(message: &str, json: Option<&Value>) -> bool {
    let message = message.to_lowercase();
    if message.contains("balance") || message.contains("insufficient") {
        return true;
    }
    json.and_then(|json| json.get("code"))
        .and_then(Value::as_str)
        .is_some_and(|code| code.eq_ignore_ascii_case("INSUFFICIENT_FUNDS"))
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::payments::types::{PaymentResponse, PaymentStatus};
    use reqwest::header::HeaderValue;

    fn fail(status: u16, body: &str) -> ShwaryError {
        map_response::<Value>(status, body, None).unwrap_err()
    }

    #[test]
    fn test_success_decodes() {
        let response: PaymentResponse = map_response(
            200,
            r#"{"id":"tx-1","status":"pending","isSandbox":true,"amount":5000}"#,
            None,
        )
        .unwrap();
        assert_eq!(response.id, "tx-1");
        assert_eq!(response.status, PaymentStatus::Pending);
        assert_eq!(response.amount.and_then(|a| a.as_u64()), Some(5000));
    }

    #[test]
    fn test_undecodable_success_keeps_body() {
        let err = map_response::<PaymentResponse>(200, "<html>ok</html>", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.raw_body(), Some("<html>ok</html>"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(fail(400, r#"{"message":"bad phone"}"#).kind(), ErrorKind::Validation);
        assert_eq!(fail(401, r#"{"message":"bad key"}"#).kind(), ErrorKind::Authentication);
        assert_eq!(fail(403, "").kind(), ErrorKind::Authentication);
        assert_eq!(fail(402, "").kind(), ErrorKind::InsufficientFunds);
        assert_eq!(fail(429, "").kind(), ErrorKind::RateLimited);
        assert_eq!(fail(404, "").kind(), ErrorKind::Api);
        assert_eq!(fail(503, "").kind(), ErrorKind::Api);
    }

    #[test]
    fn test_remote_validation_carries_response() {
        let err = fail(400, r#"{"message":["amount too low","phone invalid"]}"#);
        assert!(!err.is_local());
        assert_eq!(err.to_string(), "validation failed: amount too low; phone invalid");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_balance_400_is_insufficient_funds() {
        let err = fail(400, r#"{"message":"Insufficient balance on merchant account"}"#);
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        let err = fail(
            400,
            r#"{"message":"Transaction failed","code":"INSUFFICIENT_FUNDS"}"#,
        );
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(
            err.response().and_then(|r| r.field("code")),
            Some(&Value::from("INSUFFICIENT_FUNDS"))
        );
    }

    #[test]
    fn test_non_json_body_is_kept() {
        let err = fail(502, "Bad Gateway from upstream proxy");
        let api = err.response().unwrap();
        assert_eq!(api.message, "Bad Gateway from upstream proxy");
        assert_eq!(api.body, "Bad Gateway from upstream proxy");
        assert!(api.json.is_none());
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        let err = fail(503, "");
        assert_eq!(err.response().unwrap().message, "Service Unavailable");
    }

    #[test]
    fn test_error_field_fallback() {
        let err = fail(500, r#"{"error":"Internal Server Error","statusCode":500}"#);
        assert_eq!(err.response().unwrap().message, "Internal Server Error");
    }

    #[test]
    fn test_long_text_is_truncated_but_body_kept() {
        let body = "é".repeat(300);
        let err = fail(500, &body);
        let api = err.response().unwrap();
        assert_eq!(api.message.chars().count(), MAX_MESSAGE_CHARS + 3);
        assert_eq!(api.body, body);
    }

    #[test]
    fn test_rate_limit_keeps_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let retry_after = parse_retry_after(&headers);
        assert_eq!(retry_after, Some(Duration::from_secs(7)));

        let err = RawResponse::new(429, "{}")
            .with_retry_after(retry_after)
            .into_result::<Value>()
            .unwrap_err();
        match err {
            ShwaryError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_http_date_retry_after_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }
}
