//! Wire request construction.
//!
//! # Responsibilities
//! - Turn a validated [`PaymentRequest`] or a transaction id into an [`ApiRequest`]
//! - Attach the merchant authentication headers computed at client build time
//! - Pick the sandbox or production route
//!
//! # Design Decisions
//! - Building a request is infallible; header values are checked once, in [`AuthHeaders::new`]
//! - Paths are kept as segments and encoded by `url`, so ids never alter the route
//! - The body is built field by field so an absent callback is omitted, not `null`

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use url::Url;

use crate::config::ConfigError;
use crate::payments::types::PaymentRequest;

pub const MERCHANT_ID_HEADER: &str = "x-merchant-id";
pub const MERCHANT_KEY_HEADER: &str = "x-merchant-key";

const CLIENT_USER_AGENT: &str = concat!("shwary-rust/", env!("CARGO_PKG_VERSION"));

/// Headers sent with every call, precomputed from the merchant credentials.
#[derive(Clone)]
pub struct AuthHeaders(HeaderMap);

impl AuthHeaders {
    pub fn new(merchant_id: &str, merchant_key: &SecretString) -> Result<Self, ConfigError> {
        let invalid = |field: &str| {
            ConfigError::Validation(vec![crate::config::FieldError {
                field: field.to_string(),
                message: "contains characters not allowed in an HTTP header".to_string(),
            }])
        };

        let id = HeaderValue::from_str(merchant_id.trim()).map_err(|_| invalid("merchant_id"))?;
        let mut key = HeaderValue::from_str(merchant_key.expose_secret())
            .map_err(|_| invalid("merchant_key"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(HeaderName::from_static(MERCHANT_ID_HEADER), id);
        headers.insert(HeaderName::from_static(MERCHANT_KEY_HEADER), key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        Ok(Self(headers))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.0
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("headers", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One HTTP call, ready for a transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments relative to the base URL, unencoded.
    pub segments: Vec<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Route relative to the base URL, for logs and assertions.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Absolute URL under `base`, keeping the base path.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&self.segments);
        }
        url
    }
}

/// `POST /payment/{COUNTRY}` or `POST /payment/sandbox/{COUNTRY}`.
pub fn build_payment_request(
    payment: &PaymentRequest,
    auth: &AuthHeaders,
    sandbox: bool,
) -> ApiRequest {
    let mut segments = vec!["payment".to_string()];
    if sandbox {
        segments.push("sandbox".to_string());
    }
    segments.push(payment.country().as_str().to_string());

    let mut body = json!({
        "amount": payment.amount(),
        "clientPhoneNumber": payment.phone_number(),
        "country": payment.country().as_str(),
    });
    if let (Some(callback), Some(fields)) = (payment.callback_url(), body.as_object_mut()) {
        fields.insert("callbackUrl".to_string(), Value::from(callback));
    }

    ApiRequest {
        method: Method::POST,
        segments,
        headers: auth.headers().clone(),
        body: Some(body),
    }
}

/// `GET /transactions/{id}`. The id must already be validated.
pub fn build_transaction_request(transaction_id: &str, auth: &AuthHeaders) -> ApiRequest {
    ApiRequest {
        method: Method::GET,
        segments: vec!["transactions".to_string(), transaction_id.to_string()],
        headers: auth.headers().clone(),
        body: None,
    }
}
