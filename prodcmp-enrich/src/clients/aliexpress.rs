//! AliExpress image search through RapidAPI
//!
//! `GET https://<host>/item_search_image?sort=default&catId=0&imgUrl=<image>`
//! authenticated with the `X-RapidAPI-Key` / `X-RapidAPI-Host` headers.
//! Item fields arrive loosely typed (numbers as strings, prices as ranges),
//! so they are read as JSON values and normalised into [`ExpressProduct`].

use super::{build_http_client, status_error, LookupClient, LookupError};
use crate::models::ExpressProduct;
use async_trait::async_trait;
use prodcmp_common::config::RapidApiConfig;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchByImageResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default, rename = "resultList")]
    result_list: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    #[serde(default)]
    item: Option<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    #[serde(default)]
    item_id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    sales: Value,
    #[serde(default)]
    item_url: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    sku: Sku,
    #[serde(default)]
    average_star_rate: Value,
}

#[derive(Debug, Default, Deserialize)]
struct Sku {
    #[serde(default)]
    def: SkuDefault,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkuDefault {
    #[serde(default)]
    price: Value,
    #[serde(default)]
    promotion_price: Value,
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::String(s) => s.trim().trim_end_matches('+').parse().unwrap_or(0),
        _ => 0,
    }
}

/// Protocol-relative URLs (`//host/path`) become `https://host/path`
fn normalize_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

fn normalize_item(item: Item) -> ExpressProduct {
    let sale_price = value_to_f64(&item.sku.def.promotion_price).unwrap_or(0.0);
    let original_price = value_to_f64(&item.sku.def.price).unwrap_or(sale_price);

    // Any non-null rating counts as rated, even if it does not parse
    let avg_rating_star = match &item.average_star_rate {
        Value::Null => None,
        other => Some(value_to_f64(other).unwrap_or(0.0)),
    };

    ExpressProduct {
        id: value_to_string(&item.item_id),
        url: normalize_url(&item.item_url),
        title: item.title,
        image_url: normalize_url(&item.image),
        avg_rating_star,
        volume: value_to_i64(&item.sales),
        sale_price,
        original_price,
        total_review: String::new(),
    }
}

/// RapidAPI AliExpress client
pub struct AliExpressClient {
    http_client: reqwest::Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
}

impl AliExpressClient {
    pub fn new(
        config: &RapidApiConfig,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: format!("https://{}", config.host),
            host: config.host.clone(),
            api_key,
        })
    }

    /// Send requests to `base_url` instead of `https://<host>`
    ///
    /// The `X-RapidAPI-Host` header keeps the configured host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LookupClient for AliExpressClient {
    type Item = ExpressProduct;

    fn name(&self) -> &'static str {
        "AliExpress"
    }

    async fn search_by_image(&self, image_url: &str) -> Result<Vec<ExpressProduct>, LookupError> {
        if image_url.trim().is_empty() {
            return Err(LookupError::EmptyImageUrl);
        }
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;

        let url = format!("{}/item_search_image", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("sort", "default"), ("catId", "0"), ("imgUrl", image_url)])
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.host)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let data: SearchByImageResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        let products: Vec<ExpressProduct> = data
            .result
            .result_list
            .into_iter()
            .filter_map(|entry| entry.item)
            .map(normalize_item)
            .collect();

        tracing::debug!(
            image_url = %image_url,
            results = products.len(),
            "AliExpress lookup successful"
        );

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_items(json: &str) -> Vec<ExpressProduct> {
        let data: SearchByImageResponse = serde_json::from_str(json).unwrap();
        data.result
            .result_list
            .into_iter()
            .filter_map(|e| e.item)
            .map(normalize_item)
            .collect()
    }

    #[test]
    fn test_item_normalisation() {
        let products = parse_items(
            r#"{"result": {"resultList": [{"item": {
                "itemId": 1005001, "title": "Lamp", "sales": "1200+",
                "itemUrl": "//www.aliexpress.com/item/1005001.html",
                "image": "//ae01.alicdn.com/kf/lamp.jpg",
                "sku": {"def": {"price": "12.50", "promotionPrice": 9.99}},
                "averageStarRate": 4.7
            }}]}}"#,
        );

        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.id, "1005001");
        assert_eq!(p.url, "https://www.aliexpress.com/item/1005001.html");
        assert_eq!(p.image_url, "https://ae01.alicdn.com/kf/lamp.jpg");
        assert_eq!(p.volume, 1200);
        assert_eq!(p.sale_price, 9.99);
        assert_eq!(p.original_price, 12.5);
        assert_eq!(p.avg_rating_star, Some(4.7));
    }

    #[test]
    fn test_missing_rating_and_price_range() {
        let products = parse_items(
            r#"{"result": {"resultList": [{"item": {
                "itemId": "77", "image": "https://img/77.jpg",
                "sku": {"def": {"price": "3.10 - 5.20", "promotionPrice": 2.5}},
                "averageStarRate": null
            }}, {}]}}"#,
        );

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].avg_rating_star, None);
        assert_eq!(products[0].original_price, 2.5);
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let client =
            AliExpressClient::new(&RapidApiConfig::default(), None, Duration::from_secs(1))
                .unwrap();
        let err = client.search_by_image("https://img/1.jpg").await.unwrap_err();
        assert!(matches!(err, LookupError::MissingApiKey));
    }
}
