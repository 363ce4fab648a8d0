//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check credentials are well-formed and safe to put in headers
//! - Validate value ranges (timeout > 0, delays ordered, jitter in range)
//! - Check configured country rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShwaryConfig → Result<(), Vec<FieldError>>
//! - Runs before a client is built

use std::fmt;

use reqwest::header::HeaderValue;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;
use url::Url;
use uuid::Uuid;

use crate::config::schema::ShwaryConfig;
use crate::payments::countries::CountryRule;

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every field of `config`.
pub fn validate_config(config: &ShwaryConfig) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    let merchant_id = config.merchant_id.trim();
    if merchant_id.is_empty() {
        errors.push(FieldError::new("merchant_id", "is required"));
    } else if merchant_id.len() != 36 || Uuid::try_parse(merchant_id).is_err() {
        errors.push(FieldError::new(
            "merchant_id",
            "must be a hyphenated UUID (xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)",
        ));
    }

    let key = config.merchant_key.expose_secret();
    if key.trim().is_empty() {
        errors.push(FieldError::new("merchant_key", "is required"));
    } else if HeaderValue::from_str(key).is_err() {
        errors.push(FieldError::new(
            "merchant_key",
            "contains characters not allowed in an HTTP header",
        ));
    }

    match Url::parse(&config.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
        Ok(_) => errors.push(FieldError::new(
            "base_url",
            "must be an absolute http(s) URL",
        )),
        Err(e) => errors.push(FieldError::new("base_url", e.to_string())),
    }

    if config.timeout_secs == 0 {
        errors.push(FieldError::new("timeout_secs", "must be greater than 0"));
    }

    let retry = &config.retry;
    if retry.max_attempts == 0 {
        errors.push(FieldError::new("retry.max_attempts", "must be at least 1"));
    }
    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(FieldError::new(
            "retry.base_delay_ms",
            format!("must not exceed retry.max_delay_ms ({})", retry.max_delay_ms),
        ));
    }
    if !(0.0..=1.0).contains(&retry.jitter_ratio) {
        errors.push(FieldError::new(
            "retry.jitter_ratio",
            "must be between 0.0 and 1.0",
        ));
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        errors.push(FieldError::new("logging.level", e.to_string()));
    }

    for (index, rule) in config.countries.iter().enumerate() {
        validate_country(index, rule, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_country(index: usize, rule: &CountryRule, errors: &mut Vec<FieldError>) {
    let field = |name: &str| format!("countries[{index}].{name}");

    if rule.code.as_str().is_empty() {
        errors.push(FieldError::new(field("code"), "is required"));
    }
    if rule.currency.len() != 3 || !rule.currency.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(FieldError::new(
            field("currency"),
            "must be a three-letter upper-case code",
        ));
    }
    if !rule.min_amount.is_finite() || rule.min_amount <= 0.0 {
        errors.push(FieldError::new(
            field("min_amount"),
            "must be a positive number",
        ));
    }
    let digits = rule.phone_prefix.strip_prefix('+').unwrap_or("");
    if digits.is_empty() || digits.len() > 3 || !digits.chars().all(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new(
            field("phone_prefix"),
            "must be '+' followed by 1 to 3 digits",
        ));
    }
}
