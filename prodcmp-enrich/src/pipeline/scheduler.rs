//! Bounded fan-out / fan-in over a batch of work items
//!
//! Every item gets its own task. A shared semaphore caps how many run at
//! once; each task acquires an owned permit before touching the item and
//! the permit drops on any exit path, panics included. Results travel back
//! as `(index, output)` pairs into a buffer pre-sized to the batch, so the
//! returned vector lines up with the input regardless of completion order.

use async_trait::async_trait;
use prodcmp_common::config::DEFAULT_CONCURRENCY;
use prodcmp_common::{Error, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info};

/// Progress is reported after this many completed items
const PROGRESS_INTERVAL: usize = 10;

/// Turns one input into one output
#[async_trait]
pub trait WorkItemHandler<I, O>: Send + Sync
where
    I: Send + Sync,
    O: Send,
{
    /// Must absorb its own failures and always produce an output
    async fn handle(&self, item: &I) -> O;

    /// Output used when the task for `item` died before reporting
    fn degraded(&self, item: &I) -> O;
}

/// Runs a batch with at most `concurrency_limit` items in flight
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    concurrency_limit: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY,
        }
    }
}

impl Scheduler {
    pub fn new(concurrency_limit: usize) -> Result<Self> {
        if concurrency_limit == 0 {
            return Err(Error::InvalidInput(
                "concurrency limit must be greater than 0".to_string(),
            ));
        }
        Ok(Self { concurrency_limit })
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Process every input; `output[i]` always corresponds to `inputs[i]`
    pub async fn run<I, O, H>(&self, inputs: Vec<I>, handler: Arc<H>) -> Vec<O>
    where
        I: Send + Sync + 'static,
        O: Send + 'static,
        H: WorkItemHandler<I, O> + ?Sized + 'static,
    {
        let total = inputs.len();
        if total == 0 {
            return Vec::new();
        }

        info!(
            total = total,
            concurrency = self.concurrency_limit,
            "Starting batch"
        );

        let inputs: Arc<[I]> = inputs.into();
        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, O)>();

        for index in 0..total {
            let inputs = Arc::clone(&inputs);
            let semaphore = Arc::clone(&semaphore);
            let handler = Arc::clone(&handler);
            let tx = tx.clone();

            tokio::spawn(async move {
                let Ok(permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let output = handler.handle(&inputs[index]).await;
                drop(permit);

                // Receiver outlives every sender
                let _ = tx.send((index, output));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<O>> = std::iter::repeat_with(|| None).take(total).collect();
        let mut completed = 0;

        while completed < total {
            // None once every task has finished or died
            let Some((index, output)) = rx.recv().await else {
                break;
            };
            slots[index] = Some(output);
            completed += 1;

            if completed % PROGRESS_INTERVAL == 0 || completed == total {
                info!("Progress: {}/{} items processed", completed, total);
            }
        }

        if completed < total {
            error!(
                missing = total - completed,
                "Some work items did not report a result"
            );
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    error!(index = index, "Work item aborted, using degraded output");
                    handler.degraded(&inputs[index])
                })
            })
            .collect()
    }
}
