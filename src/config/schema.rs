//! Configuration schema definitions.
//!
//! All types deserialize from TOML. Every field except the merchant
//! credentials has a default so a minimal file is two lines long.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::payments::countries::{CountryRule, CountryRules};

/// Production endpoint of the merchant API.
pub const DEFAULT_BASE_URL: &str = "https://api.shwary.com/api/v1/merchants";

/// Root configuration for a client.
///
/// Not `Clone` or `Serialize`: the merchant key stays in one place and is
/// never written back out.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShwaryConfig {
    /// Merchant identifier (hyphenated UUID).
    pub merchant_id: String,

    /// Merchant secret key.
    #[serde(deserialize_with = "deserialize_secret")]
    pub merchant_key: SecretString,

    /// Target the sandbox routes instead of production.
    pub sandbox: bool,

    /// API root, without a trailing slash.
    pub base_url: String,

    /// Per-attempt request timeout in seconds.
    pub timeout_secs: u64,

    /// Retry policy.
    pub retry: RetryConfig,

    /// Log sink settings.
    pub logging: LoggingConfig,

    /// Extra or overriding country rules.
    pub countries: Vec<CountryRule>,
}

impl ShwaryConfig {
    /// Config with the given credentials and defaults everywhere else.
    pub fn new(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_key: secret(merchant_key.into()),
            ..Self::default()
        }
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Built-in rules with the configured ones applied on top.
    pub fn country_rules(&self) -> CountryRules {
        CountryRules::builtin().with_overrides(self.countries.iter().cloned())
    }
}

impl Default for ShwaryConfig {
    fn default() -> Self {
        Self {
            merchant_id: String::new(),
            merchant_key: secret(String::new()),
            sandbox: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
            countries: Vec::new(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, the first one included.
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,

    /// Upper bound for any single wait in milliseconds.
    pub max_delay_ms: u64,

    /// Fraction of each delay added as random jitter (0.0 disables it).
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2_000,
            max_delay_ms: 10_000,
            jitter_ratio: 0.0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `info` or `shwary=debug`.
    pub level: String,

    /// Emit JSON records instead of plain text.
    pub json: bool,

    /// Write records to stdout.
    pub console: bool,

    /// Also append records to this file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            console: true,
            file: None,
        }
    }
}

pub(crate) fn secret(value: String) -> SecretString {
    SecretString::new(value.into_boxed_str())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(secret)
}
