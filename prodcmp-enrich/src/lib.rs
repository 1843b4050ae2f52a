//! prodcmp-enrich library
//!
//! Enriches shop product records with image-search matches from AliHunter
//! and AliExpress, curates a top-N list per source, and writes JSON and
//! HTML comparison reports.

pub mod app;
pub mod clients;
pub mod error;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod report;

pub use error::{EnrichError, Result};
