//! Bounded-concurrency batch fetching with streamed progress
//!
//! One tokio task per key, gated by a semaphore, reporting outcomes over a
//! channel as they finish. Consumers pull `FetchProgress` triples until the
//! whole batch has been observed. One item failing never disturbs its
//! siblings; the failure is reported as a triple like any other result.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::Semaphore;

use crate::error::HarvestError;

/// Cap on simultaneously in-flight fetches
pub const MAX_PARALLEL_FETCHES: usize = 5;

/// Outcome of one item in a batch
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The fetched (or cache-served) value
    Fetched(T),
    /// The item failed; the batch carries on without it
    Failed { key: String, error: HarvestError },
}

/// One progress step: how far the batch is and what just completed.
/// `completed` runs from 1 to `total` across the batch.
#[derive(Debug)]
pub struct FetchProgress<T> {
    pub completed: usize,
    pub total: usize,
    pub outcome: FetchOutcome<T>,
}

/// Handle for consuming a running batch in completion order
pub struct FetchBatch<T> {
    rx: UnboundedReceiver<FetchOutcome<T>>,
    total: usize,
    completed: usize,
}

impl<T> FetchBatch<T> {
    /// Number of keys submitted
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next completed item, or `None` once every key has been observed
    pub async fn next(&mut self) -> Option<FetchProgress<T>> {
        if self.completed == self.total {
            return None;
        }
        let outcome = self.rx.recv().await?;
        self.completed += 1;
        Some(FetchProgress {
            completed: self.completed,
            total: self.total,
            outcome,
        })
    }
}

/// Run `fetch_one` for every key with at most `min(max_parallel, keys.len())`
/// fetches in flight, on the current tokio runtime.
///
/// Results arrive in completion order, exactly one per key. An empty key
/// list spawns nothing and the batch reports done immediately.
pub fn fetch_all<T, F, Fut>(keys: Vec<String>, max_parallel: usize, fetch_one: F) -> FetchBatch<T>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<T, HarvestError>> + Send + 'static,
{
    let total = keys.len();
    let (tx, rx) = unbounded_channel();

    if total == 0 {
        return FetchBatch {
            rx,
            total,
            completed: 0,
        };
    }

    let semaphore = Arc::new(Semaphore::new(max_parallel.min(total)));
    let fetch_one = Arc::new(fetch_one);

    for key in keys {
        let tx = tx.clone();
        let semaphore = Arc::clone(&semaphore);
        let fetch_one = Arc::clone(&fetch_one);
        tokio::spawn(async move {
            let _permit = semaphore.acquire().await.unwrap();
            let outcome = match fetch_one(key.clone()).await {
                Ok(value) => FetchOutcome::Fetched(value),
                Err(error) => FetchOutcome::Failed { key, error },
            };
            // A dropped batch handle closes the channel; nothing to do then
            let _ = tx.send(outcome);
        });
    }

    FetchBatch {
        rx,
        total,
        completed: 0,
    }
}
