//
//  ebay-sdk
//  api/batch.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Concurrent Batch Executor
//!
//! Runs keyed tasks with at most `N` in flight. Each task is a closure that
//! builds its future only once a slot is free, so requests are constructed
//! per task rather than shared.
//!
//! ## Guarantees
//!
//! - At most [`concurrency`](BatchExecutor::concurrency) tasks run at once
//! - Every task runs exactly once; a failure never cancels its siblings
//! - Results are keyed by the caller's key, not by completion order
//! - A panicking task yields [`SdkError::Runtime`] under its own key
//! - Dropping the `run_bounded` future aborts every task already started
//!
//! ## Example
//!
//! ```rust,no_run
//! use ebay_sdk::api::{BatchExecutor, SdkResult};
//!
//! # async fn run() {
//! let executor = BatchExecutor::new(4);
//! let tasks = (1..=10u32).map(|id| (id, move || async move { SdkResult::Ok(id * 2) }));
//!
//! let results = executor.run_bounded(tasks).await;
//! assert_eq!(results.len(), 10);
//! # }
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::common::{SdkError, SdkResult};

/// Semaphore bounding how many tasks are in flight.
#[derive(Debug, Clone)]
struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    permits: usize,
}

impl ConcurrencyLimiter {
    fn new(permits: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            permits,
        }
    }

    async fn acquire(&self) -> SdkResult<OwnedSemaphorePermit> {
        if self.semaphore.available_permits() == 0 {
            debug!(in_use = self.permits, "Batch at capacity; waiting for a slot");
        }
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| SdkError::Runtime(e.to_string()))
    }
}

/// Runs batches of keyed tasks with bounded concurrency.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    concurrency: usize,
}

impl BatchExecutor {
    /// Creates an executor running at most `concurrency` tasks at once.
    /// Zero is treated as one.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every task and returns the results keyed by task key.
    ///
    /// Must be awaited inside a tokio runtime. Tasks start in iteration
    /// order as slots free up. If two tasks share a key, the later
    /// result wins.
    ///
    /// # Parameters
    ///
    /// * `tasks` - `(key, factory)` pairs; each factory is called once, when
    ///   its task is allowed to start
    pub async fn run_bounded<K, T, F, Fut, I>(&self, tasks: I) -> BTreeMap<K, SdkResult<T>>
    where
        I: IntoIterator<Item = (K, F)>,
        K: Ord + Clone + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = SdkResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let limiter = ConcurrencyLimiter::new(self.concurrency);
        let mut running: JoinSet<(K, SdkResult<T>)> = JoinSet::new();
        let mut results = BTreeMap::new();
        let mut started = 0usize;

        for (key, task) in tasks {
            let permit = match limiter.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    results.insert(key, Err(e));
                    continue;
                }
            };

            started += 1;
            running.spawn(async move {
                let _permit = permit;
                let outcome = AssertUnwindSafe(async move { task().await })
                    .catch_unwind()
                    .await;
                let result = outcome
                    .unwrap_or_else(|panic| Err(SdkError::Runtime(panic_message(&*panic))));
                (key, result)
            });

            while let Some(done) = running.try_join_next() {
                record(&mut results, done);
            }
        }

        debug!(tasks = started, concurrency = self.concurrency, "Waiting for batch to drain");

        while let Some(done) = running.join_next().await {
            record(&mut results, done);
        }

        results
    }
}

fn record<K: Ord, T>(
    results: &mut BTreeMap<K, SdkResult<T>>,
    done: Result<(K, SdkResult<T>), tokio::task::JoinError>,
) {
    match done {
        Ok((key, result)) => {
            results.insert(key, result);
        }
        // Tasks catch their own panics and are only aborted when the set is
        // dropped, so this is unreachable while the batch is being awaited.
        Err(e) => warn!("Batch task ended without a result: {}", e),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("task panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("task panicked: {}", message)
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
        runs: AtomicUsize,
    }

    impl Gauge {
        async fn work(&self, millis: u64) {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(millis)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_never_exceeds_bound() {
        let gauge = Arc::new(Gauge::default());
        let executor = BatchExecutor::new(3);

        let tasks = (0..20u32).map(|i| {
            let gauge = gauge.clone();
            (i, move || async move {
                gauge.work(5 + u64::from(i % 4) * 3).await;
                Ok(i)
            })
        });

        let results = executor.run_bounded(tasks).await;

        assert_eq!(results.len(), 20);
        assert!(gauge.peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gauge.peak.load(Ordering::SeqCst), 3);
        assert_eq!(gauge.runs.load(Ordering::SeqCst), 20);
        for (key, result) in results {
            assert_eq!(result.unwrap(), key);
        }
    }

    #[tokio::test]
    async fn test_results_keyed_not_ordered_by_completion() {
        let executor = BatchExecutor::new(4);
        let tasks = [("slow", 40u64), ("fast", 1), ("medium", 15)].map(|(key, millis)| {
            (key.to_string(), move || async move {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(millis)
            })
        });

        let results = executor.run_bounded(tasks).await;
        assert_eq!(*results["slow"].as_ref().unwrap(), 40);
        assert_eq!(*results["fast"].as_ref().unwrap(), 1);
        assert_eq!(*results["medium"].as_ref().unwrap(), 15);
    }

    #[tokio::test]
    async fn test_failures_do_not_cancel_siblings() {
        let gauge = Arc::new(Gauge::default());
        let executor = BatchExecutor::new(2);

        let tasks = (1..=6u32).map(|i| {
            let gauge = gauge.clone();
            (i, move || async move {
                gauge.work(2).await;
                if i % 2 == 0 {
                    Err(SdkError::Network(format!("item {} failed", i)))
                } else {
                    Ok(i)
                }
            })
        });

        let results = executor.run_bounded(tasks).await;
        assert_eq!(gauge.runs.load(Ordering::SeqCst), 6);
        assert!(results[&2].is_err());
        assert!(results[&3].is_ok());
        assert!(matches!(results[&6], Err(SdkError::Network(_))));
    }

    #[tokio::test]
    async fn test_panicking_task_reports_under_its_key() {
        let executor = BatchExecutor::new(2);
        let tasks: Vec<(u32, Box<dyn FnOnce() -> futures::future::BoxFuture<'static, SdkResult<u32>> + Send>)> = vec![
            (1, Box::new(|| async { Ok::<u32, SdkError>(1) }.boxed())),
            (
                2,
                Box::new(|| {
                    async {
                        if true {
                            panic!("bad payload");
                        }
                        Ok::<u32, SdkError>(2)
                    }
                    .boxed()
                }),
            ),
            (3, Box::new(|| async { Ok::<u32, SdkError>(3) }.boxed())),
        ];

        let results = executor.run_bounded(tasks).await;
        assert_eq!(*results[&1].as_ref().unwrap(), 1);
        assert!(matches!(&results[&2], Err(SdkError::Runtime(m)) if m.contains("bad payload")));
        assert_eq!(*results[&3].as_ref().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_zero_concurrency_runs_sequentially() {
        let gauge = Arc::new(Gauge::default());
        let executor = BatchExecutor::new(0);
        assert_eq!(executor.concurrency(), 1);

        let tasks = (0..4u32).map(|i| {
            let gauge = gauge.clone();
            (i, move || async move {
                gauge.work(2).await;
                Ok(())
            })
        });

        let results = executor.run_bounded(tasks).await;
        assert_eq!(results.len(), 4);
        assert_eq!(gauge.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropping_batch_aborts_started_tasks() {
        let finished = Arc::new(AtomicUsize::new(0));
        let executor = BatchExecutor::new(2);

        let tasks = (0..4u32).map(|i| {
            let finished = finished.clone();
            (i, move || async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        });

        let batch = executor.run_bounded(tasks);
        let timed_out = tokio::time::timeout(Duration::from_millis(20), batch).await;
        assert!(timed_out.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }
}
