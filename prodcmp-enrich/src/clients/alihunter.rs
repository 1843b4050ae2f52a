//! AliHunter image search client
//!
//! `POST <endpoint>` with a JSON body naming the image and the search
//! locale. The service wraps its matches as `result.data.data` and flags
//! failures with `result.ret = false`.

use super::{build_http_client, status_error, LookupClient, LookupError};
use crate::models::HunterProduct;
use async_trait::async_trait;
use prodcmp_common::config::AliHunterConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SearchByImageRequest<'a> {
    image_url: &'a str,
    search_type: &'a str,
    currency: &'a str,
    lang: &'a str,
    ship_to: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchByImageResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    ret: bool,
    #[serde(default)]
    data: SearchData,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    data: Vec<HunterProduct>,
}

/// AliHunter API client
pub struct AliHunterClient {
    http_client: reqwest::Client,
    config: AliHunterConfig,
}

impl AliHunterClient {
    pub fn new(config: AliHunterConfig, timeout: Duration) -> Result<Self, LookupError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            config,
        })
    }
}

#[async_trait]
impl LookupClient for AliHunterClient {
    type Item = HunterProduct;

    fn name(&self) -> &'static str {
        "AliHunter"
    }

    async fn search_by_image(&self, image_url: &str) -> Result<Vec<HunterProduct>, LookupError> {
        if image_url.trim().is_empty() {
            return Err(LookupError::EmptyImageUrl);
        }

        let body = SearchByImageRequest {
            image_url,
            search_type: &self.config.search_type,
            currency: &self.config.currency,
            lang: &self.config.lang,
            ship_to: &self.config.ship_to,
        };

        tracing::debug!(image_url = %image_url, "Querying AliHunter image search");

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(&body)
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

        if !data.result.ret {
            return Err(LookupError::Upstream("AliHunter returned ret=false".to_string()));
        }

        let products = data.result.data.data;
        tracing::debug!(
            image_url = %image_url,
            results = products.len(),
            "AliHunter lookup successful"
        );

        Ok(products)
    }
}
