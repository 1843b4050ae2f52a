//! # prodcmp common library
//!
//! Shared code for the product comparison tools:
//! - Error type used across crates
//! - TOML configuration model, discovery and write-back
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
