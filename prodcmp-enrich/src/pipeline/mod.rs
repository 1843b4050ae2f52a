//! Enrichment pipeline
//!
//! [`Scheduler`] fans a batch out under a concurrency limit,
//! [`WorkItemProcessor`] enriches one record, and the selector curates
//! each candidate list.

pub mod processor;
pub mod scheduler;
pub mod selector;

pub use processor::{ExpressLookup, HunterLookup, ProcessorOptions, WorkItemProcessor};
pub use scheduler::{Scheduler, WorkItemHandler};
pub use selector::{select_top, select_with_origin, Eligibility, Selection};
