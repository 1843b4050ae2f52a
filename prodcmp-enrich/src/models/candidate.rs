//! Candidate items and the properties the selector looks at
//!
//! Each source returns its own product shape. [`Candidate`] exposes the few
//! fields eligibility depends on so one selector serves all three lists.

use super::input::ProductItem;
use serde::{Deserialize, Serialize};

/// Review count written when a review lookup fails
///
/// With review enrichment disabled `total_review` is left empty.
pub const DEFAULT_REVIEW_COUNT: &str = "0 ratings";

/// Fields the top-N selector needs from any candidate
pub trait Candidate {
    fn product_id(&self) -> &str;

    /// Primary image reference; empty when the source had none
    fn main_image_url(&self) -> &str;

    /// Whether the source supplied a rating for this item
    fn has_rating(&self) -> bool;

    fn sales_volume(&self) -> i64;
}

/// Candidates that can carry a review count fetched separately
pub trait ReviewTarget: Candidate {
    fn set_total_review(&mut self, count: String);
}

impl Candidate for ProductItem {
    fn product_id(&self) -> &str {
        &self.product_id
    }

    fn main_image_url(&self) -> &str {
        &self.product_main_image_url
    }

    fn has_rating(&self) -> bool {
        self.avg_star > 0.0
    }

    fn sales_volume(&self) -> i64 {
        self.sale
    }
}

/// Match returned by the AliHunter image search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterProduct {
    pub product_id: String,
    pub evaluate_rate: String,
    pub product_title: String,
    pub product_main_image_url: String,
    pub product_detail_url: String,
    pub target_sale_price: String,
    pub target_original_price: String,
    pub latest_volume: String,
    pub similarity_score: String,
    pub ship_from: String,
    pub target_sale_price_currency: String,
    pub matching: bool,
    pub total_review: String,
}

impl Candidate for HunterProduct {
    fn product_id(&self) -> &str {
        &self.product_id
    }

    fn main_image_url(&self) -> &str {
        &self.product_main_image_url
    }

    fn has_rating(&self) -> bool {
        !self.evaluate_rate.trim().is_empty()
    }

    fn sales_volume(&self) -> i64 {
        self.latest_volume.trim().parse().unwrap_or(0)
    }
}

impl ReviewTarget for HunterProduct {
    fn set_total_review(&mut self, count: String) {
        self.total_review = count;
    }
}

/// Match returned by the AliExpress image search, normalised
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressProduct {
    #[serde(rename = "ProductID")]
    pub id: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    /// Average rating (0-5); `None` when the source sent no rating
    #[serde(rename = "AvgRatingStar")]
    pub avg_rating_star: Option<f64>,
    #[serde(rename = "Volume")]
    pub volume: i64,
    #[serde(rename = "SalePrice")]
    pub sale_price: f64,
    #[serde(rename = "OriginalPrice")]
    pub original_price: f64,
    #[serde(rename = "TotalReview")]
    pub total_review: String,
}

impl Candidate for ExpressProduct {
    fn product_id(&self) -> &str {
        &self.id
    }

    fn main_image_url(&self) -> &str {
        &self.image_url
    }

    fn has_rating(&self) -> bool {
        self.avg_rating_star.is_some()
    }

    fn sales_volume(&self) -> i64 {
        self.volume
    }
}

impl ReviewTarget for ExpressProduct {
    fn set_total_review(&mut self, count: String) {
        self.total_review = count;
    }
}
