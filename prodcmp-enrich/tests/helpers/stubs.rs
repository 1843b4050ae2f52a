//! In-memory lookup stubs with injectable latency and failures

use async_trait::async_trait;
use prodcmp_enrich::clients::{LookupClient, LookupError, ReviewLookup};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Image search stub keyed by image URL
///
/// Unknown images return an empty list; images in `failing` return a
/// `Status(500)` error.
pub struct StubSource<T> {
    name: &'static str,
    matches: HashMap<String, Vec<T>>,
    failing: HashSet<String>,
    max_delay_ms: u64,
    calls: AtomicUsize,
}

impl<T> StubSource<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            matches: HashMap::new(),
            failing: HashSet::new(),
            max_delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_matches(mut self, image_url: &str, items: Vec<T>) -> Self {
        self.matches.insert(image_url.to_string(), items);
        self
    }

    pub fn failing_for(mut self, image_url: &str) -> Self {
        self.failing.insert(image_url.to_string());
        self
    }

    /// Sleep a random 0..=max_delay_ms before answering
    pub fn with_random_latency(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T> LookupClient for StubSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn search_by_image(&self, image_url: &str) -> Result<Vec<T>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.max_delay_ms > 0 {
            let delay = rand::thread_rng().gen_range(0..=self.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.failing.contains(image_url) {
            return Err(LookupError::Status(500, "stub failure".to_string()));
        }
        Ok(self.matches.get(image_url).cloned().unwrap_or_default())
    }
}

/// Review lookup stub recording every requested id
#[derive(Default)]
pub struct StubReviews {
    requested: Mutex<Vec<String>>,
}

impl StubReviews {
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewLookup for StubReviews {
    async fn review_count(&self, product_id: &str) -> Result<String, LookupError> {
        self.requested.lock().unwrap().push(product_id.to_string());
        Ok(format!("{} ratings", product_id.len()))
    }
}
