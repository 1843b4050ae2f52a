//! Input loading
//!
//! Reads the whole document into memory and flattens it to records. A
//! missing or malformed document is fatal; nothing has been fetched yet.

use crate::error::{EnrichError, Result};
use crate::models::{InputDocument, SuggestionProduct};
use std::path::Path;
use tracing::info;

/// Parse an input document, grouped or flat, into work items
pub fn load_input(path: &Path) -> Result<Vec<SuggestionProduct>> {
    let input_error = |source: prodcmp_common::Error| EnrichError::Input {
        path: path.to_path_buf(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(|e| input_error(e.into()))?;
    let document: InputDocument =
        serde_json::from_str(&content).map_err(|e| input_error(e.into()))?;

    let total = document.total_records();
    let shape = match &document {
        InputDocument::Grouped(groups) => format!("{} shop groups", groups.len()),
        InputDocument::Flat(_) => "flat list".to_string(),
    };
    info!("Loaded {} records from {} ({})", total, path.display(), shape);

    Ok(document.into_records())
}
