//! Input document model
//!
//! The input is a JSON array that is either grouped by shop
//! (`[{shop_id, shop, product_count, suggestion_products: [...]}]`) or a flat
//! list of suggestion records. Both shapes flatten to the same ordered
//! sequence of [`SuggestionProduct`] records.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier that upstream exports write either as a number or as a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// Exporters write `null` for absent values; read those as the field default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One shop and the records suggested for it
///
/// `suggestion_products` is the only required field; its presence on any
/// element is what marks a document as grouped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub shop_id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shop: Shop,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_count: usize,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestion_products: Vec<SuggestionProduct>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Shop {
    #[serde(deserialize_with = "null_as_default")]
    pub shop_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub myshopify_domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plan_display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub app_plan: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
}

/// A record to enrich: the shop's product image plus locally known candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionProduct {
    #[serde(rename = "_id")]
    pub id: serde_json::Value,
    #[serde(deserialize_with = "null_as_default")]
    pub shop_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub product_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub job_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub products: Vec<ProductItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub product: Product,
    #[serde(rename = "producturl", deserialize_with = "null_as_default")]
    pub product_url: String,
}

/// Locally known candidate shipped with the input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductItem {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub item_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(rename = "productid", deserialize_with = "null_as_default")]
    pub product_id: String,
    #[serde(rename = "producturl", deserialize_with = "null_as_default")]
    pub product_url: String,
    #[serde(rename = "productmainimageurl", deserialize_with = "null_as_default")]
    pub product_main_image_url: String,
    #[serde(rename = "producttitle", deserialize_with = "null_as_default")]
    pub product_title: String,
    #[serde(rename = "targetsaleprice", deserialize_with = "null_as_default")]
    pub target_sale_price: String,
    #[serde(rename = "targetoriginalprice", deserialize_with = "null_as_default")]
    pub target_original_price: String,
    #[serde(rename = "avgstar", deserialize_with = "null_as_default")]
    pub avg_star: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sale: i64,
    /// Number, string, or `{"$numberLong": "..."}` depending on the exporter
    #[serde(rename = "totalreview")]
    pub total_review: serde_json::Value,
}

/// The shop product the record was built for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "null_as_default")]
    pub product_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub shop_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub product_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub handle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_reviews: i64,
}

/// Parsed input document, in either accepted shape
#[derive(Debug, Clone)]
pub enum InputDocument {
    Grouped(Vec<ShopGroup>),
    Flat(Vec<SuggestionProduct>),
}

impl<'de> Deserialize<'de> for InputDocument {
    /// The shape is chosen up front so a bad grouped document is an error
    /// rather than a flat list of empty records.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let grouped = elements
            .iter()
            .any(|element| element.get("suggestion_products").is_some());
        let document = serde_json::Value::Array(elements);

        if grouped {
            serde_json::from_value(document)
                .map(InputDocument::Grouped)
                .map_err(|e| serde::de::Error::custom(format!("invalid shop group: {}", e)))
        } else {
            serde_json::from_value(document)
                .map(InputDocument::Flat)
                .map_err(|e| serde::de::Error::custom(format!("invalid record: {}", e)))
        }
    }
}

impl InputDocument {
    /// Total number of records, summed over groups
    pub fn total_records(&self) -> usize {
        match self {
            InputDocument::Grouped(groups) => {
                groups.iter().map(|g| g.suggestion_products.len()).sum()
            }
            InputDocument::Flat(records) => records.len(),
        }
    }

    /// Flatten to records in group order, then in-group order
    pub fn into_records(self) -> Vec<SuggestionProduct> {
        match self {
            InputDocument::Grouped(groups) => groups
                .into_iter()
                .flat_map(|g| g.suggestion_products)
                .collect(),
            InputDocument::Flat(records) => records,
        }
    }
}
