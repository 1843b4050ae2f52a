//! prodcmp-enrich - product enrichment and comparison report
//!
//! Default mode reads an input document of shop product records, looks up
//! image matches on AliHunter and AliExpress for each record, and writes
//! the JSON report. `--html` renders an existing JSON report instead.

use anyhow::{Context, Result};
use clap::Parser;
use prodcmp_common::config::{self, TomlConfig};
use prodcmp_common::logging::init_tracing;
use prodcmp_enrich::app::{run_fetch, run_html, FetchOptions};
use std::path::PathBuf;
use tracing::{info, warn};

/// Command-line arguments for prodcmp-enrich
#[derive(Parser, Debug)]
#[command(name = "prodcmp-enrich")]
#[command(about = "Enrich shop products with image-search matches and build a comparison report")]
#[command(version)]
struct Args {
    /// Input document with the records to enrich
    #[arg(long, default_value = "./docs/suggest_products.json")]
    local: PathBuf,

    /// JSON report path (written in fetch mode, read in HTML mode)
    #[arg(long, default_value = "report.json")]
    json: PathBuf,

    /// Render HTML from the JSON report instead of fetching
    #[arg(long)]
    html: bool,

    /// HTML report path
    #[arg(short, long, default_value = "report.html")]
    output: PathBuf,

    /// Maximum number of records processed at once
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Candidates kept per list
    #[arg(long)]
    top_n: Option<usize>,

    /// Config file (overrides PRODCMP_CONFIG and the default location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RapidAPI key (overrides PRODCMP_RAPIDAPI_KEY and the config file)
    #[arg(long)]
    rapidapi_key: Option<String>,

    /// Keep unrated candidates in the top lists
    #[arg(long)]
    no_rating_filter: bool,

    /// Also render HTML after fetching
    #[arg(long)]
    with_html: bool,

    /// Write a config file with default values to this path and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

impl Args {
    /// Command-line values sit above the config file
    fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(concurrency) = self.concurrency {
            config.pipeline.concurrency = concurrency;
        }
        if let Some(top_n) = self.top_n {
            config.pipeline.top_n = top_n;
        }
        if self.no_rating_filter {
            config.pipeline.apply_rating_filter = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        config::write_toml_config(&TomlConfig::default(), path)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        println!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let mut config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging).context("Failed to initialise logging")?;

    info!("Starting prodcmp-enrich v{}", env!("CARGO_PKG_VERSION"));
    info!("Build: {} ({})", env!("GIT_HASH"), env!("BUILD_TIMESTAMP"));

    // Loader messages predate the subscriber
    match config::resolve_config_path(args.config.as_deref()) {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) if args.config.is_some() => {
            warn!("Config file {} not found, using built-in defaults", path.display())
        }
        _ => info!("Configuration: built-in defaults"),
    }

    if args.html {
        let count = run_html(&args.json, &args.output).context("Failed to render HTML report")?;
        info!("HTML report with {} records written to {}", count, args.output.display());
        return Ok(());
    }

    args.apply_overrides(&mut config);
    let rapidapi_key = config::resolve_rapidapi_key(args.rapidapi_key.as_deref(), &config);

    let options = FetchOptions {
        input: args.local.clone(),
        json_output: args.json.clone(),
        html_output: args.with_html.then(|| args.output.clone()),
    };

    run_fetch(&config, rapidapi_key, &options)
        .await
        .context("Enrichment run failed")?;

    info!("Report written to {}", args.json.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["prodcmp-enrich"]);
        assert_eq!(args.json, PathBuf::from("report.json"));
        assert_eq!(args.output, PathBuf::from("report.html"));
        assert!(!args.html);
        assert!(args.concurrency.is_none());
    }

    #[test]
    fn test_overrides_applied_to_config() {
        let args = Args::parse_from([
            "prodcmp-enrich",
            "--concurrency",
            "9",
            "--top-n",
            "5",
            "--no-rating-filter",
        ]);
        let mut config = TomlConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.pipeline.concurrency, 9);
        assert_eq!(config.pipeline.top_n, 5);
        assert!(!config.pipeline.apply_rating_filter);
    }
}
