//! Per-record enrichment
//!
//! One record fans out to both image-search sources at once and joins on
//! both before assembling its [`ComparisonReport`]. Lookup failures never
//! escape: the affected source contributes empty lists and the error is
//! logged with the record's identifier.

use super::scheduler::WorkItemHandler;
use super::selector::{select_with_origin, Eligibility, Selection};
use crate::clients::{LookupClient, LookupError, ReviewLookup};
use crate::models::{
    ComparisonReport, ExpressProduct, HunterProduct, ReviewTarget, SuggestionProduct,
    DEFAULT_REVIEW_COUNT,
};
use async_trait::async_trait;
use futures::future::join_all;
use prodcmp_common::config::PipelineConfig;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub type HunterLookup = Arc<dyn LookupClient<Item = HunterProduct>>;
pub type ExpressLookup = Arc<dyn LookupClient<Item = ExpressProduct>>;

/// How each record's lists are curated
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorOptions {
    pub top_n: usize,
    /// Applied to both remote source lists
    pub eligibility: Eligibility,
    pub local_eligibility: Eligibility,
    pub include_origin: bool,
    pub record_errors: bool,
    pub call_timeout: Duration,
}

impl ProcessorOptions {
    pub fn from_pipeline(config: &PipelineConfig) -> Self {
        Self {
            top_n: config.top_n,
            eligibility: Eligibility::from_pipeline(config),
            local_eligibility: Eligibility::local_from_pipeline(config),
            include_origin: config.include_origin,
            record_errors: config.record_errors,
            call_timeout: config.call_timeout(),
        }
    }
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self::from_pipeline(&PipelineConfig::default())
    }
}

/// Result of one source lookup after selection
struct SourceOutcome<T> {
    selection: Selection<T>,
    error: Option<String>,
}

/// Builds one [`ComparisonReport`] per input record
pub struct WorkItemProcessor {
    hunter: HunterLookup,
    express: ExpressLookup,
    reviews: Option<Arc<dyn ReviewLookup>>,
    options: ProcessorOptions,
}

impl WorkItemProcessor {
    pub fn new(hunter: HunterLookup, express: ExpressLookup, options: ProcessorOptions) -> Self {
        Self {
            hunter,
            express,
            reviews: None,
            options,
        }
    }

    /// Fill `total_review` on every kept remote candidate
    pub fn with_reviews(mut self, reviews: Arc<dyn ReviewLookup>) -> Self {
        self.reviews = Some(reviews);
        self
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Enrich one record; never fails
    pub async fn process(&self, record: &SuggestionProduct) -> ComparisonReport {
        let record_id = record.product_id.to_string();

        let (hunter, express) = tokio::join!(
            self.fetch_source(self.hunter.as_ref(), &record.image_url, &record_id),
            self.fetch_source(self.express.as_ref(), &record.image_url, &record_id),
        );

        let local = select_with_origin(
            &record.products,
            self.options.top_n,
            &self.options.local_eligibility,
        );

        let mut report = ComparisonReport::for_record(record);
        report.local_top = local.top;
        report.hunter_top = hunter.selection.top;
        report.express_top = express.selection.top;

        if self.options.include_origin {
            report.local_origin = Some(local.origin);
            report.hunter_origin = Some(hunter.selection.origin);
            report.express_origin = Some(express.selection.origin);
        }

        if hunter.error.is_some() {
            report.failed_sources.push(self.hunter.name().to_string());
        }
        if express.error.is_some() {
            report.failed_sources.push(self.express.name().to_string());
        }
        if self.options.record_errors {
            report.hunter_error = hunter.error;
            report.express_error = express.error;
        }

        debug!(
            product_id = %record_id,
            local = report.local_top.len(),
            alihunter = report.hunter_top.len(),
            aliexpress = report.express_top.len(),
            "Record enriched"
        );

        report
    }

    async fn fetch_source<C>(
        &self,
        client: &C,
        image_url: &str,
        record_id: &str,
    ) -> SourceOutcome<C::Item>
    where
        C: LookupClient + ?Sized,
        C::Item: ReviewTarget + Clone,
    {
        match with_timeout(self.options.call_timeout, client.search_by_image(image_url)).await {
            Ok(items) => {
                let mut selection =
                    select_with_origin(&items, self.options.top_n, &self.options.eligibility);
                if !self.options.include_origin {
                    selection.origin.clear();
                }
                self.attach_review_counts(&mut selection, client.name()).await;
                SourceOutcome {
                    selection,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    product_id = %record_id,
                    source = client.name(),
                    error = %e,
                    "Lookup failed, continuing with empty results"
                );
                SourceOutcome {
                    selection: Selection::default(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Look up each distinct product id once and write the counts back
    async fn attach_review_counts<T>(&self, selection: &mut Selection<T>, source: &'static str)
    where
        T: ReviewTarget,
    {
        let Some(reviews) = &self.reviews else {
            return;
        };
        let call_timeout = self.options.call_timeout;

        let mut ids: Vec<String> = Vec::new();
        for item in selection.top.iter().chain(selection.origin.iter()) {
            let id = item.product_id();
            if !id.is_empty() && !ids.iter().any(|known| known == id) {
                ids.push(id.to_string());
            }
        }

        let lookups = ids.into_iter().map(|id| {
            let reviews = Arc::clone(reviews);
            async move {
                let count = match with_timeout(call_timeout, reviews.review_count(&id)).await {
                    Ok(count) => count,
                    Err(e) => {
                        warn!(
                            source = source,
                            candidate_id = %id,
                            error = %e,
                            "Failed to get review count"
                        );
                        DEFAULT_REVIEW_COUNT.to_string()
                    }
                };
                (id, count)
            }
        });
        let counts: HashMap<String, String> = join_all(lookups).await.into_iter().collect();

        for item in selection.top.iter_mut().chain(selection.origin.iter_mut()) {
            let count = counts
                .get(item.product_id())
                .cloned()
                .unwrap_or_else(|| DEFAULT_REVIEW_COUNT.to_string());
            item.set_total_review(count);
        }
    }
}

/// Apply the per-call timeout to a remote call
async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, LookupError>
where
    F: Future<Output = Result<T, LookupError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(LookupError::Timeout(limit)))
}

#[async_trait]
impl WorkItemHandler<SuggestionProduct, ComparisonReport> for WorkItemProcessor {
    async fn handle(&self, item: &SuggestionProduct) -> ComparisonReport {
        self.process(item).await
    }

    fn degraded(&self, item: &SuggestionProduct) -> ComparisonReport {
        let mut report = ComparisonReport::for_record(item);
        report.failed_sources = vec![
            self.hunter.name().to_string(),
            self.express.name().to_string(),
        ];
        if self.options.include_origin {
            report.local_origin = Some(Vec::new());
            report.hunter_origin = Some(Vec::new());
            report.express_origin = Some(Vec::new());
        }
        if self.options.record_errors {
            let message = "enrichment task aborted".to_string();
            report.hunter_error = Some(message.clone());
            report.express_error = Some(message);
        }
        report
    }
}
