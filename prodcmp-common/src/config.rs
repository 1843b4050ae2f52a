//! Configuration loading and resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments (applied by the binary on top of the result)
//! 2. Environment variables (`PRODCMP_*`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing TOML file is not fatal: a warning is logged and the defaults
//! are used. A file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PRODCMP_CONFIG";

/// Environment variable carrying the RapidAPI key
pub const RAPIDAPI_KEY_ENV_VAR: &str = "PRODCMP_RAPIDAPI_KEY";

/// Environment variable overriding the RapidAPI host
pub const RAPIDAPI_HOST_ENV_VAR: &str = "PRODCMP_RAPIDAPI_HOST";

const CONFIG_DIR_NAME: &str = "prodcmp";
const CONFIG_FILE_NAME: &str = "prodcmp.toml";

/// Root of the TOML configuration file
///
/// Every section is optional; absent sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    pub alihunter: AliHunterConfig,
    pub rapidapi: RapidApiConfig,
    pub reviews: ReviewsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Enrichment pipeline tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of records being enriched at the same time
    pub concurrency: usize,

    /// Number of candidates kept per list
    pub top_n: usize,

    /// Keep only remote candidates that carry a rating
    pub apply_rating_filter: bool,

    /// Same filter for the record's own local candidates
    pub local_apply_rating_filter: bool,

    /// Keep only candidates with a positive sales volume
    pub require_positive_sales: bool,

    /// Also emit the unfiltered, length-capped "origin" lists
    pub include_origin: bool,

    /// Record the lookup error message on the output record
    pub record_errors: bool,

    /// Fetch the review count for every remote candidate that is kept
    pub enrich_reviews: bool,

    /// Upper bound for a single remote call, in seconds
    pub call_timeout_secs: u64,
}

/// Default number of records in flight
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default length of each curated list
pub const DEFAULT_TOP_N: usize = 3;

/// Default per-call timeout in seconds
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            top_n: DEFAULT_TOP_N,
            apply_rating_filter: true,
            local_apply_rating_filter: false,
            require_positive_sales: false,
            include_origin: true,
            record_errors: false,
            enrich_reviews: true,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config(
                "pipeline.concurrency must be greater than 0".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(Error::Config(
                "pipeline.top_n must be greater than 0".to_string(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(Error::Config(
                "pipeline.call_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// AliHunter image search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliHunterConfig {
    pub endpoint: String,
    pub search_type: String,
    pub currency: String,
    pub lang: String,
    pub ship_to: String,
}

impl Default for AliHunterConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://product-source-api.staging.alihunter.io/aliexpress/api/products/ds-image-search-v2"
                .to_string(),
            search_type: "same".to_string(),
            currency: "USD".to_string(),
            lang: "en".to_string(),
            ship_to: "US".to_string(),
        }
    }
}

/// AliExpress image search through RapidAPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RapidApiConfig {
    pub host: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for RapidApiConfig {
    fn default() -> Self {
        Self {
            host: "aliexpress-datahub.p.rapidapi.com".to_string(),
            api_key: None,
        }
    }
}

/// Review count lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsConfig {
    pub endpoint: String,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://feedback.aliexpress.com/pc/searchEvaluation.do".to_string(),
        }
    }
}

/// Platform default location of the config file
///
/// `<config_dir>/prodcmp/prodcmp.toml`, e.g. `~/.config/prodcmp/prodcmp.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Pick the config file to read
///
/// Command-line argument, then `PRODCMP_CONFIG`, then the platform default.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve, read and env-adjust the configuration
///
/// Falls back to defaults when no file exists at the resolved location.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path).map_err(|e| {
                Error::Config(format!("Failed to load {}: {}", path.display(), e))
            })?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        Some(path) => {
            if cli_arg.is_some() {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
            } else {
                debug!("No config file at {}, using built-in defaults", path.display());
            }
            TomlConfig::default()
        }
        None => {
            warn!("Could not determine config directory, using built-in defaults");
            TomlConfig::default()
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Apply `PRODCMP_*` environment overrides that sit above the TOML tier
pub fn apply_env_overrides(config: &mut TomlConfig) {
    if let Ok(host) = std::env::var(RAPIDAPI_HOST_ENV_VAR) {
        if !host.trim().is_empty() {
            debug!(host = %host, "RapidAPI host overridden from environment");
            config.rapidapi.host = host.trim().to_string();
        }
    }
}

/// Resolve the RapidAPI key
///
/// **Priority:** command line → environment → TOML. Returns `None` when no
/// tier holds a usable key; callers decide whether that is fatal.
pub fn resolve_rapidapi_key(cli_key: Option<&str>, toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(RAPIDAPI_KEY_ENV_VAR).ok();
    let toml_key = toml_config.rapidapi.api_key.as_deref();

    let candidates = [
        ("command line", cli_key),
        ("environment", env_key.as_deref()),
        ("TOML", toml_key),
    ];

    let sources: Vec<&str> = candidates
        .iter()
        .filter(|(_, key)| key.is_some_and(is_valid_key))
        .map(|(source, _)| *source)
        .collect();

    if sources.len() > 1 {
        warn!(
            "RapidAPI key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    let (source, key) = candidates
        .into_iter()
        .find(|(_, key)| key.is_some_and(is_valid_key))?;
    let key = key?;

    info!("RapidAPI key loaded from {}", source);
    Some(key.trim().to_string())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Write a config file, replacing any existing one
///
/// Writes to a sibling temp file first and renames it into place so a
/// reader never sees a half-written file.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
