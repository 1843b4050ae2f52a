//! Report assembler
//!
//! Writes the ordered [`ComparisonReport`] list as pretty JSON and renders
//! the HTML page from it. HTML mode reads the JSON back, so both outputs
//! always describe the same run.

pub mod html;

pub use html::{format_price, render_html};

use crate::error::{EnrichError, Result};
use crate::models::ComparisonReport;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use tracing::info;

/// Pretty-printed JSON array, one entry per input record
pub fn write_json_report(reports: &[ComparisonReport], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    create_parent_dir(path)?;
    fs::write(path, json)?;
    info!("Wrote {} report entries to {}", reports.len(), path.display());
    Ok(())
}

pub fn read_json_report(path: &Path) -> Result<Vec<ComparisonReport>> {
    let content = fs::read_to_string(path).map_err(|e| {
        EnrichError::Report(format!("failed to read {}: {}", path.display(), e))
    })?;
    let reports: Vec<ComparisonReport> = serde_json::from_str(&content).map_err(|e| {
        EnrichError::Report(format!("failed to parse {}: {}", path.display(), e))
    })?;
    info!("Read {} report entries from {}", reports.len(), path.display());
    Ok(reports)
}

/// Render with the current local time and write to `path`
pub fn write_html_report(reports: &[ComparisonReport], path: &Path) -> Result<()> {
    let generated_at: DateTime<Local> = Local::now();
    let html = render_html(reports, &generated_at.to_rfc3339())?;
    create_parent_dir(path)?;
    fs::write(path, html)?;
    info!("Wrote HTML report to {}", path.display());
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
