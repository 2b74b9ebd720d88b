//! Keyed concurrent fan-out with incremental merging.
//!
//! A [`FanOut`] collects `(key, producer)` pairs and drives every producer
//! concurrently. Each completion is handed to a caller-supplied merge function
//! as soon as it resolves, so partial results are visible while the rest of
//! the batch is still in flight. A failed producer never fails the batch: the
//! merge function receives the error for that key and decides the fallback.
//!
//! Cancellation is cooperative. Once the supplied token fires, no further
//! completion is merged and the remaining producers are dropped.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use fanout::FanOut;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut batch: FanOut<'_, u64, u32, String> = FanOut::new();
//! batch.push(1, async { Ok(10) });
//! batch.push(2, async { Err("offline".to_owned()) });
//!
//! let mut totals = BTreeMap::new();
//! let report = batch
//!     .run(&CancellationToken::new(), |key, outcome| {
//!         totals.insert(key, outcome.unwrap_or(0));
//!     })
//!     .await;
//!
//! assert!(report.is_complete());
//! assert_eq!(report.failed, 1);
//! assert_eq!(totals, BTreeMap::from([(1, 10), (2, 0)]));
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

type KeyedFuture<'a, K, V, E> = Pin<Box<dyn Future<Output = (K, Result<V, E>)> + Send + 'a>>;

/// Summary of one fan-out run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Number of producers pushed before the run started.
    pub issued: usize,
    /// Number of completions handed to the merge function.
    pub settled: usize,
    /// Number of settled completions that carried an error.
    pub failed: usize,
    /// Whether the run stopped because its token was cancelled.
    pub cancelled: bool,
}

impl FanOutReport {
    /// Return true when every issued producer was merged.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        !self.cancelled && self.settled == self.issued
    }
}

/// A batch of keyed producers awaiting a concurrent run.
pub struct FanOut<'a, K, V, E> {
    pending: FuturesUnordered<KeyedFuture<'a, K, V, E>>,
}

impl<'a, K, V, E> FanOut<'a, K, V, E>
where
    K: Send + 'a,
    V: Send + 'a,
    E: Send + 'a,
{
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: FuturesUnordered::new(),
        }
    }

    /// Queue one producer under `key`.
    ///
    /// Producers are not polled until [`FanOut::run`] is awaited.
    pub fn push<F>(&mut self, key: K, producer: F)
    where
        F: Future<Output = Result<V, E>> + Send + 'a,
    {
        self.pending
            .push(Box::pin(async move { (key, producer.await) }));
    }

    /// Number of queued producers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Return true when no producer has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drive every producer concurrently, merging completions in the order
    /// they resolve.
    ///
    /// The merge function is never called after `cancel` fires; completions
    /// that race with the cancellation are dropped.
    pub async fn run<M>(mut self, cancel: &CancellationToken, mut merge: M) -> FanOutReport
    where
        M: FnMut(K, Result<V, E>),
    {
        let mut report = FanOutReport {
            issued: self.pending.len(),
            ..FanOutReport::default()
        };

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                next = self.pending.next() => {
                    let Some((key, outcome)) = next else {
                        break;
                    };
                    if cancel.is_cancelled() {
                        report.cancelled = true;
                        break;
                    }
                    if outcome.is_err() {
                        report.failed += 1;
                    }
                    report.settled += 1;
                    merge(key, outcome);
                }
            }
        }

        report
    }
}

impl<'a, K, V, E> Default for FanOut<'a, K, V, E>
where
    K: Send + 'a,
    V: Send + 'a,
    E: Send + 'a,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> fmt::Debug for FanOut<'_, K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("pending", &self.pending.len())
            .finish()
    }
}
