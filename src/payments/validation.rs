//! Local validation of payment input.
//!
//! # Responsibilities
//! - Resolve the country rule
//! - Enforce the amount floor
//! - Normalize the phone number to E.164 and check it belongs to the country
//! - Check the optional callback URL and transaction ids
//!
//! # Design Decisions
//! - Pure functions, no I/O: invalid input never costs a round trip
//! - Error messages describe the expected format and never echo the phone number

use url::Url;

use crate::error::{Result, ShwaryError};
use crate::payments::countries::{CountryCode, CountryRule, CountryRules};
use crate::payments::types::PaymentRequest;

/// Validate raw caller input and build a [`PaymentRequest`].
pub fn validate_payment(
    rules: &CountryRules,
    country: &str,
    amount: f64,
    phone_number: &str,
    callback_url: Option<&str>,
) -> Result<PaymentRequest> {
    let rule = rules.get(country).ok_or_else(|| {
        ShwaryError::validation(format!(
            "unsupported country '{}'; supported: {}",
            country.trim(),
            rules.codes().join(", ")
        ))
    })?;

    validate_amount(amount, rule)?;
    let phone_number = normalize_phone(phone_number, rule)?;
    let callback_url = validate_callback_url(callback_url)?;

    Ok(PaymentRequest::new(
        rule.code.clone(),
        rule.currency.clone(),
        amount,
        phone_number,
        callback_url,
    ))
}

/// Check the amount is a positive number at or above the country's minimum.
pub fn validate_amount(amount: f64, rule: &CountryRule) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ShwaryError::validation(format!(
            "amount must be a positive number (minimum for {} is {} {})",
            rule.code, rule.min_amount, rule.currency
        )));
    }
    if amount < rule.min_amount {
        return Err(ShwaryError::validation(format!(
            "amount is below the minimum for {}: {} {}",
            rule.code, rule.min_amount, rule.currency
        )));
    }
    Ok(())
}

/// Normalize a phone number to E.164 and check it matches the country.
///
/// Accepted spellings for a DRC number: `+243972345678`, `243972345678`,
/// `00243972345678`, `0972345678`, `+243 97 234 5678`.
pub fn normalize_phone(raw: &str, rule: &CountryRule) -> Result<String> {
    let expected = rule.expected_phone_format();
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if compact.is_empty() {
        return Err(ShwaryError::validation(format!(
            "phone number is empty; expected {expected}"
        )));
    }

    let candidate = if compact.starts_with('+') {
        compact
    } else if let Some(rest) = compact.strip_prefix("00") {
        format!("+{rest}")
    } else if compact.starts_with(rule.dial_digits()) {
        format!("+{compact}")
    } else if let Some(national) = compact.strip_prefix('0') {
        format!("{}{national}", rule.phone_prefix)
    } else {
        format!("{}{compact}", rule.phone_prefix)
    };

    if !candidate[1..].chars().all(|c| c.is_ascii_digit()) {
        return Err(ShwaryError::validation(format!(
            "phone number contains invalid characters; expected {expected}"
        )));
    }

    let parsed = phonenumber::parse(None, &candidate).map_err(|e| {
        ShwaryError::validation(format!(
            "phone number could not be parsed ({e}); expected {expected}"
        ))
    })?;

    if Some(parsed.code().value()) != rule.calling_code() {
        return Err(ShwaryError::validation(format!(
            "phone number does not belong to {}; expected {expected}",
            rule.code
        )));
    }
    if !phonenumber::is_valid(&parsed) {
        return Err(ShwaryError::validation(format!(
            "phone number is not a valid {} number; expected {expected}",
            rule.code
        )));
    }

    Ok(parsed.format().mode(phonenumber::Mode::E164).to_string())
}

/// Check an optional callback URL. Empty strings count as absent.
pub fn validate_callback_url(url: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let parsed = Url::parse(raw)
        .map_err(|e| ShwaryError::validation(format!("callback URL is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ShwaryError::validation(
            "callback URL must be an absolute http(s) URL",
        ));
    }
    Ok(Some(raw.to_string()))
}

/// Check a transaction id is usable as a single path segment.
pub fn validate_transaction_id(transaction_id: &str) -> Result<&str> {
    if transaction_id.is_empty() {
        return Err(ShwaryError::validation("transaction id is empty"));
    }
    if transaction_id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#'))
    {
        return Err(ShwaryError::validation(
            "transaction id contains characters that are not allowed",
        ));
    }
    Ok(transaction_id)
}

/// Codes of the countries in `rules`, for callers building their own forms.
pub fn supported_countries(rules: &CountryRules) -> Vec<CountryCode> {
    rules.codes().into_iter().map(CountryCode::new).collect()
}
