//! Top-N selection
//!
//! Selection is a prefix filter: scan in source order, keep eligible items,
//! stop after `n`. Items are never re-ranked; the sources already return
//! them in relevance order.

use crate::models::Candidate;
use prodcmp_common::config::PipelineConfig;

/// Predicates a candidate must pass to be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub require_image: bool,
    pub require_rating: bool,
    pub require_positive_sales: bool,
}

impl Default for Eligibility {
    fn default() -> Self {
        Self::image_only()
    }
}

impl Eligibility {
    /// Only a non-empty primary image is required
    pub const fn image_only() -> Self {
        Self {
            require_image: true,
            require_rating: false,
            require_positive_sales: false,
        }
    }

    /// Predicates for the remote source lists
    pub fn from_pipeline(config: &PipelineConfig) -> Self {
        Self {
            require_image: true,
            require_rating: config.apply_rating_filter,
            require_positive_sales: config.require_positive_sales,
        }
    }

    /// Predicates for the record's own local candidates
    ///
    /// Image only unless `local_apply_rating_filter` is set; the sales
    /// requirement never applies here.
    pub fn local_from_pipeline(config: &PipelineConfig) -> Self {
        Self {
            require_image: true,
            require_rating: config.local_apply_rating_filter,
            require_positive_sales: false,
        }
    }

    pub fn accepts<T: Candidate>(&self, item: &T) -> bool {
        if self.require_image && item.main_image_url().trim().is_empty() {
            return false;
        }
        if self.require_rating && !item.has_rating() {
            return false;
        }
        if self.require_positive_sales && item.sales_volume() <= 0 {
            return false;
        }
        true
    }
}

/// First `n` eligible items, in input order
pub fn select_top<T: Candidate + Clone>(items: &[T], n: usize, eligibility: &Eligibility) -> Vec<T> {
    items
        .iter()
        .filter(|item| eligibility.accepts(*item))
        .take(n)
        .cloned()
        .collect()
}

/// Filtered top-N alongside the raw prefix it was drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub top: Vec<T>,
    /// First `n` items regardless of eligibility
    pub origin: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            top: Vec::new(),
            origin: Vec::new(),
        }
    }
}

pub fn select_with_origin<T: Candidate + Clone>(
    items: &[T],
    n: usize,
    eligibility: &Eligibility,
) -> Selection<T> {
    Selection {
        top: select_top(items, n, eligibility),
        origin: items.iter().take(n).cloned().collect(),
    }
}
