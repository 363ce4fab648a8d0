//! Country rule table.
//!
//! # Responsibilities
//! - Map a country code to its currency, minimum amount and phone prefix
//! - Accept extra or overriding rules from configuration
//!
//! # Design Decisions
//! - Rules are data keyed by [`CountryCode`]; supporting a country is a table
//!   entry, never a new branch
//! - Built once per client and shared read-only

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper-cased country code as used in the provider's routes (`DRC`, `KE`, `UG`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CountryCode(Cow<'static, str>);

impl CountryCode {
    /// Democratic Republic of the Congo.
    pub const DRC: CountryCode = CountryCode(Cow::Borrowed("DRC"));
    pub const KENYA: CountryCode = CountryCode(Cow::Borrowed("KE"));
    pub const UGANDA: CountryCode = CountryCode(Cow::Borrowed("UG"));

    /// Normalize a user-supplied code (trimmed, upper-cased).
    pub fn new(code: &str) -> Self {
        Self(Cow::Owned(code.trim().to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CountryCode {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0.into_owned()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business rules for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRule {
    pub code: CountryCode,
    /// ISO 4217 currency code the amount is expressed in.
    pub currency: String,
    /// Smallest accepted amount, inclusive.
    pub min_amount: f64,
    /// International prefix every phone number must carry, e.g. `+243`.
    pub phone_prefix: String,
}

impl CountryRule {
    pub fn new(
        code: CountryCode,
        currency: impl Into<String>,
        min_amount: f64,
        phone_prefix: impl Into<String>,
    ) -> Self {
        Self {
            code,
            currency: currency.into(),
            min_amount,
            phone_prefix: phone_prefix.into(),
        }
    }

    /// Prefix digits without the leading `+`.
    pub fn dial_digits(&self) -> &str {
        self.phone_prefix.trim_start_matches('+')
    }

    /// Numeric calling code (`243` for `+243`).
    pub fn calling_code(&self) -> Option<u16> {
        self.dial_digits().parse().ok()
    }

    /// Human-readable format hint used in validation messages.
    pub fn expected_phone_format(&self) -> String {
        format!("{}XXXXXXXXX", self.phone_prefix)
    }
}

/// The rule table.
#[derive(Debug, Clone)]
pub struct CountryRules {
    rules: HashMap<CountryCode, CountryRule>,
}

impl CountryRules {
    /// The countries the provider supports out of the box.
    pub fn builtin() -> Self {
        let mut rules = Self::empty();
        rules.insert(CountryRule::new(CountryCode::DRC, "CDF", 2900.0, "+243"));
        rules.insert(CountryRule::new(CountryCode::KENYA, "KES", 1.0, "+254"));
        rules.insert(CountryRule::new(CountryCode::UGANDA, "UGX", 1.0, "+256"));
        rules
    }

    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace a rule, returning the one it replaced.
    pub fn insert(&mut self, rule: CountryRule) -> Option<CountryRule> {
        self.rules.insert(rule.code.clone(), rule)
    }

    /// Apply configured rules on top of this table.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = CountryRule>,
    {
        for rule in overrides {
            self.insert(rule);
        }
        self
    }

    /// Case-insensitive lookup.
    pub fn get(&self, code: &str) -> Option<&CountryRule> {
        self.rules.get(&CountryCode::new(code))
    }

    /// Supported codes in sorted order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().map(CountryCode::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CountryRules {
    fn default() -> Self {
        Self::builtin()
    }
}
