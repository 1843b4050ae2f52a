//! Fatal error type for prodcmp-enrich
//!
//! Only setup and output failures end up here. Per-record lookup failures
//! are absorbed by the pipeline and never surface as an [`EnrichError`].

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichError>;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// Input document missing or malformed
    #[error("Failed to read input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: prodcmp_common::Error,
    },

    /// Report could not be produced or read back
    #[error("Report error: {0}")]
    Report(String),

    /// Lookup client could not be constructed
    #[error("Client setup failed: {0}")]
    ClientSetup(#[from] crate::clients::LookupError),

    #[error("Common error: {0}")]
    Common(#[from] prodcmp_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
