//! Remote lookup clients
//!
//! Two image-search sources plus the per-item review count lookup. Clients
//! never retry; any failure is returned to the caller, which decides how to
//! degrade.

pub mod aliexpress;
pub mod alihunter;
pub mod reviews;

pub use aliexpress::AliExpressClient;
pub use alihunter::AliHunterClient;
pub use reviews::FeedbackReviewClient;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("prodcmp-enrich/", env!("CARGO_PKG_VERSION"));

/// Lookup client errors
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("image URL cannot be empty")]
    EmptyImageUrl,

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("unexpected status code {0}: {1}")]
    Status(u16, String),

    #[error("failed to decode response: {0}")]
    Parse(String),

    #[error("upstream reported failure: {0}")]
    Upstream(String),

    #[error("call timed out after {0:?}")]
    Timeout(Duration),
}

/// Image-based similarity search against one remote source
#[async_trait]
pub trait LookupClient: Send + Sync {
    /// Candidate type this source produces
    type Item: Send;

    /// Source name used in logs
    fn name(&self) -> &'static str;

    /// Ranked matches for an image, as returned by the source
    async fn search_by_image(&self, image_url: &str) -> Result<Vec<Self::Item>, LookupError>;
}

/// Review count for a single remote product
#[async_trait]
pub trait ReviewLookup: Send + Sync {
    /// Count formatted for display, e.g. `"12 ratings"`
    async fn review_count(&self, product_id: &str) -> Result<String, LookupError>;
}

/// Shared reqwest client construction
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, LookupError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| LookupError::Network(e.to_string()))
}

/// Read the body of a non-success response into a `Status` error
pub(crate) async fn status_error(response: reqwest::Response) -> LookupError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    LookupError::Status(status.as_u16(), body)
}
