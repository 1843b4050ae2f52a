//! Tracing subscriber initialisation
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to the
//! prodcmp crates and `warn` to everything else.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Build the default filter directive for a log level
pub fn default_directive(level: &str) -> Result<String> {
    let level = level.trim().to_ascii_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return Err(Error::Config(format!(
            "Unknown log level '{}' (expected one of: {})",
            level,
            LEVELS.join(", ")
        )));
    }
    Ok(format!(
        "warn,prodcmp_common={level},prodcmp_enrich={level}"
    ))
}

/// Install the global tracing subscriber
///
/// Fails if a subscriber is already installed or the log file cannot be opened.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let directive = default_directive(&config.level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| Error::Internal(format!("Failed to initialise tracing: {}", e)))
}
