//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{secret, ShwaryConfig};
use crate::config::validation::{validate_config, FieldError};

pub const ENV_MERCHANT_ID: &str = "SHWARY_MERCHANT_ID";
pub const ENV_MERCHANT_KEY: &str = "SHWARY_MERCHANT_KEY";
pub const ENV_SANDBOX: &str = "SHWARY_SANDBOX";
pub const ENV_BASE_URL: &str = "SHWARY_BASE_URL";

/// Error type for configuration loading and client construction.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<FieldError>),
    Env { var: &'static str, message: String },
    Transport(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Transport(message) => {
                write!(f, "HTTP client setup failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Load a TOML file, apply environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<ShwaryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ShwaryConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    config.apply_overrides_from(|var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        path = %path.display(),
        sandbox = config.sandbox,
        countries = config.countries.len(),
        "Configuration loaded"
    );

    Ok(config)
}

impl ShwaryConfig {
    /// Build a validated config from `SHWARY_*` environment variables alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides_from(lookup)?;
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overwrite fields whose variable is set. Empty values are ignored.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(id) = get(ENV_MERCHANT_ID) {
            self.merchant_id = id.trim().to_string();
        }
        if let Some(key) = get(ENV_MERCHANT_KEY) {
            self.merchant_key = secret(key);
        }
        if let Some(raw) = get(ENV_SANDBOX) {
            self.sandbox = parse_bool(&raw).ok_or_else(|| ConfigError::Env {
                var: ENV_SANDBOX,
                message: format!("expected true/false, got '{}'", raw.trim()),
            })?;
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url.trim().to_string();
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
