//! Output record: one comparison per input record

use super::candidate::{ExpressProduct, HunterProduct};
use super::input::{ProductItem, RecordId, SuggestionProduct};
use serde::{Deserialize, Serialize};

/// Curated lists gathered for one input record
///
/// Field names follow the report JSON consumed by the HTML page. Origin
/// lists and error strings are optional and only present when enabled;
/// `FailedSources` is present whenever a lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonReport {
    #[serde(rename = "ProductTitle")]
    pub product_title: String,
    #[serde(rename = "ProductID")]
    pub product_id: RecordId,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "ShopID")]
    pub shop_id: RecordId,

    #[serde(rename = "LocalRapidAPITop")]
    pub local_top: Vec<ProductItem>,
    #[serde(rename = "LocalRapidAPIOrigin", skip_serializing_if = "Option::is_none")]
    pub local_origin: Option<Vec<ProductItem>>,

    #[serde(rename = "AliHunterTop")]
    pub hunter_top: Vec<HunterProduct>,
    #[serde(rename = "AliHunterOrigin", skip_serializing_if = "Option::is_none")]
    pub hunter_origin: Option<Vec<HunterProduct>>,

    #[serde(rename = "AliExpressTop")]
    pub express_top: Vec<ExpressProduct>,
    #[serde(rename = "AliExpressOrigin", skip_serializing_if = "Option::is_none")]
    pub express_origin: Option<Vec<ExpressProduct>>,

    #[serde(rename = "AliHunterError", skip_serializing_if = "Option::is_none")]
    pub hunter_error: Option<String>,
    #[serde(rename = "AliExpressError", skip_serializing_if = "Option::is_none")]
    pub express_error: Option<String>,

    /// Sources whose lookup failed for this record
    #[serde(rename = "FailedSources", skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<String>,
}

impl ComparisonReport {
    /// Empty report carrying only the record's identity
    pub fn for_record(record: &SuggestionProduct) -> Self {
        Self {
            product_title: record.product.title.clone(),
            product_id: record.product_id.clone(),
            image_url: record.image_url.clone(),
            shop_id: record.shop_id.clone(),
            ..Default::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_sources.is_empty()
    }
}
