//! Test Helper Utilities
//!
//! Shared fixtures and in-memory lookup stubs for prodcmp-enrich tests

#![allow(dead_code)]

pub mod fixtures;
pub mod stubs;

pub use fixtures::{express_match, hunter_match, local_candidates, record};
pub use stubs::{StubReviews, StubSource};
