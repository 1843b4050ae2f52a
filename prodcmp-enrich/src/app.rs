//! Run orchestration
//!
//! Wires configuration into clients, drives the pipeline over an input
//! document and writes the reports. Each mode returns once every output
//! it owns is on disk.

use crate::clients::{AliExpressClient, AliHunterClient, FeedbackReviewClient};
use crate::error::Result;
use crate::input::load_input;
use crate::models::{ComparisonReport, SuggestionProduct};
use crate::pipeline::{ProcessorOptions, Scheduler, WorkItemProcessor};
use crate::report::{read_json_report, write_html_report, write_json_report};
use prodcmp_common::config::TomlConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outputs of a fetch run
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub input: PathBuf,
    pub json_output: PathBuf,
    /// Also render HTML to this path
    pub html_output: Option<PathBuf>,
}

/// Totals logged at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    /// Records with at least one failed source
    pub degraded: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            total = self.total,
            degraded = self.degraded,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "Run complete: {} records, {} with a failed source, {:.1}s",
            self.total,
            self.degraded,
            self.elapsed.as_secs_f64()
        );
    }
}

/// Build the record processor from configuration
///
/// A missing RapidAPI key is not an error here; AliExpress lookups then
/// fail per call and degrade to empty lists.
pub fn build_processor(
    config: &TomlConfig,
    rapidapi_key: Option<String>,
) -> Result<WorkItemProcessor> {
    let timeout = config.pipeline.call_timeout();

    if rapidapi_key.is_none() {
        warn!("No RapidAPI key configured; AliExpress results will be empty");
    }

    let hunter = AliHunterClient::new(config.alihunter.clone(), timeout)?;
    let express = AliExpressClient::new(&config.rapidapi, rapidapi_key, timeout)?;

    let mut processor = WorkItemProcessor::new(
        Arc::new(hunter),
        Arc::new(express),
        ProcessorOptions::from_pipeline(&config.pipeline),
    );

    if config.pipeline.enrich_reviews {
        processor = processor.with_reviews(Arc::new(FeedbackReviewClient::new(
            &config.reviews,
            timeout,
        )?));
    }

    Ok(processor)
}

/// Run every record through the processor, preserving input order
pub async fn enrich_records(
    records: Vec<SuggestionProduct>,
    processor: Arc<WorkItemProcessor>,
    scheduler: &Scheduler,
) -> (Vec<ComparisonReport>, RunSummary) {
    let started = Instant::now();
    let total = records.len();

    let reports: Vec<ComparisonReport> = scheduler.run(records, processor).await;
    let degraded = reports.iter().filter(|r| r.has_failures()).count();

    let summary = RunSummary {
        total,
        degraded,
        elapsed: started.elapsed(),
    };
    (reports, summary)
}

/// Load input, enrich it and write the JSON (and optionally HTML) report
pub async fn run_fetch(
    config: &TomlConfig,
    rapidapi_key: Option<String>,
    options: &FetchOptions,
) -> Result<RunSummary> {
    config.pipeline.validate()?;
    let scheduler = Scheduler::new(config.pipeline.concurrency)?;

    info!("Reading input from {}", options.input.display());
    let records = load_input(&options.input)?;

    let processor = Arc::new(build_processor(config, rapidapi_key)?);

    info!(
        "Fetching matches for {} records (concurrency {}, top {})",
        records.len(),
        scheduler.concurrency_limit(),
        config.pipeline.top_n
    );
    let (reports, summary) = enrich_records(records, processor, &scheduler).await;

    write_json_report(&reports, &options.json_output)?;
    if let Some(html_output) = &options.html_output {
        write_html_report(&reports, html_output)?;
    }

    summary.log();
    Ok(summary)
}

/// Render HTML from a previously written JSON report
pub fn run_html(json_input: &Path, html_output: &Path) -> Result<usize> {
    info!("Rendering {} to {}", json_input.display(), html_output.display());
    let reports = read_json_report(json_input)?;
    write_html_report(&reports, html_output)?;
    Ok(reports.len())
}
