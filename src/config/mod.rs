//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → SHWARY_* environment overrides
//!     → validation.rs (semantic checks)
//!     → ShwaryConfig (validated)
//!     → client construction (auth headers, retry policy, country rules)
//! ```
//!
//! # Design Decisions
//! - Config is read once, at client construction; clients never reload it
//! - All fields except the credentials have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{LoggingConfig, RetryConfig, ShwaryConfig, DEFAULT_BASE_URL};
pub use validation::{validate_config, FieldError};
