//! Structured logging setup.
//!
//! # Responsibilities
//! - Build the log sink from [`LoggingConfig`]
//! - Hand it back as a [`Dispatch`] the caller installs or injects into a client
//!
//! # Design Decisions
//! - Nothing is installed implicitly; `install_global` is an explicit opt-in
//! - JSON format for production, plain format for development
//! - Console and file sinks are independent layers; either, both or none may be on
//! - The file is appended to and never rotated
//! - `SHWARY_LOG` overrides the configured level

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::Dispatch;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "SHWARY_LOG";

/// Errors raised while building the log sink.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },

    #[error("cannot open log file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global log subscriber is already installed")]
    AlreadyInstalled,
}

/// Build a log sink without installing it.
pub fn init_logging(config: &LoggingConfig) -> Result<Dispatch, LoggingError> {
    let directives = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.level.clone());
    let filter = EnvFilter::try_new(&directives).map_err(|e| LoggingError::Filter {
        filter: directives.clone(),
        message: e.to_string(),
    })?;

    let console = config
        .console
        .then(|| fmt_layer(config.json, true, std::io::stdout));
    let file = match &config.file {
        Some(path) => Some(fmt_layer(config.json, false, Mutex::new(open_log_file(path)?))),
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file);
    Ok(Dispatch::new(subscriber))
}

fn fmt_layer<S, W>(json: bool, ansi: bool, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.with_ansi(ansi).boxed()
    }
}

/// Make `dispatch` the process-wide default.
pub fn install_global(dispatch: Dispatch) -> Result<(), LoggingError> {
    tracing::dispatcher::set_global_default(dispatch).map_err(|_| LoggingError::AlreadyInstalled)
}

fn open_log_file(path: &Path) -> Result<fs::File, LoggingError> {
    let to_error = |source| LoggingError::File {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)
}
