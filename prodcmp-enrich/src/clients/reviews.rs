//! Review count lookup against the AliExpress feedback endpoint

use super::{build_http_client, status_error, LookupError, ReviewLookup};
use async_trait::async_trait;
use prodcmp_common::config::ReviewsConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    data: ReviewsData,
}

#[derive(Debug, Default, Deserialize)]
struct ReviewsData {
    #[serde(default, rename = "totalNum")]
    total_num: u64,
}

pub fn format_review_count(total: u64) -> String {
    format!("{} ratings", total)
}

/// Feedback endpoint client
pub struct FeedbackReviewClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl FeedbackReviewClient {
    pub fn new(config: &ReviewsConfig, timeout: Duration) -> Result<Self, LookupError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl ReviewLookup for FeedbackReviewClient {
    async fn review_count(&self, product_id: &str) -> Result<String, LookupError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("productId", product_id), ("page", "1")])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let data: ReviewsResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(format_review_count(data.data.total_num))
    }
}
