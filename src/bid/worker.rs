use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::bid::history::BidHistoryRepository;
use crate::bid::queue::BidQueue;
use crate::bid::repository::BidRepository;
use crate::domain::Bid;
use crate::metrics::counters::Counters;

/// Background task draining queued bids into the durable stores.
///
/// Each cycle discovers live queue keys, pops a bounded batch per key and
/// bulk-copies it into the relational store and the time-series store. The
/// sinks are tried independently: a relational failure never blocks history
/// and vice versa, and a failed batch is not re-enqueued (the history sink
/// remains the authoritative record). Between cycles the loop naps for the
/// configured idle sleep; cancellation exits before the next pop.
pub struct BidWorker {
    queue: Arc<dyn BidQueue>,
    bid_repo: Arc<dyn BidRepository>,
    history_repo: Arc<dyn BidHistoryRepository>,
    pop_timeout: Duration,
    idle_sleep: Duration,
    batch_size: usize,
    key_pattern: String,
    counters: Counters,
}

impl BidWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn BidQueue>,
        bid_repo: Arc<dyn BidRepository>,
        history_repo: Arc<dyn BidHistoryRepository>,
        pop_timeout: Duration,
        idle_sleep: Duration,
        batch_size: usize,
        key_pattern: String,
        counters: Counters,
    ) -> Self {
        Self {
            queue,
            bid_repo,
            history_repo,
            pop_timeout,
            idle_sleep,
            batch_size: batch_size.max(1),
            key_pattern,
            counters,
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
        info!(pattern = %self.key_pattern, "bid drain worker started");
        loop {
            if shutdown.is_cancelled() {
                info!("bid drain worker shutting down");
                return Ok(());
            }

            let keys = match self.queue.scan_keys(&self.key_pattern).await {
                Ok(keys) => keys,
                Err(e) => {
                    warn!(error = %e, "queue key scan failed");
                    self.nap(&shutdown).await;
                    continue;
                }
            };

            if keys.is_empty() {
                self.nap(&shutdown).await;
                continue;
            }

            for key in &keys {
                if shutdown.is_cancelled() {
                    info!("bid drain worker shutting down");
                    return Ok(());
                }
                self.drain_key(key).await;
            }

            self.nap(&shutdown).await;
        }
    }

    async fn drain_key(&self, key: &str) {
        let payloads = self.pop_batch(key).await;
        if payloads.is_empty() {
            return;
        }
        self.counters
            .bids_popped
            .fetch_add(payloads.len() as u64, Ordering::Relaxed);

        let mut bids: Vec<Bid> = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            match serde_json::from_str::<Bid>(payload) {
                Ok(bid) => bids.push(bid),
                Err(e) => {
                    error!(key, error = %e, "dropping undecodable bid payload");
                    self.counters
                        .bids_dropped_decode
                        .fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        if bids.is_empty() {
            return;
        }
        debug!(key, count = bids.len(), "drained bid batch from queue");

        match self.bid_repo.bulk_copy_bids(&bids).await {
            Ok(saved) => {
                self.counters
                    .bids_saved_relational
                    .fetch_add(saved, Ordering::Relaxed);
                info!(key, saved, of = bids.len(), "relational sink write complete");
            }
            Err(e) => {
                self.counters
                    .relational_sink_failures
                    .fetch_add(1, Ordering::Relaxed);
                error!(key, count = bids.len(), error = %e, "relational sink write failed");
            }
        }

        match self.history_repo.batch_save(&bids).await {
            Ok(saved) => {
                self.counters
                    .bids_saved_history
                    .fetch_add(saved, Ordering::Relaxed);
                info!(key, saved, of = bids.len(), "history sink write complete");
            }
            Err(e) => {
                self.counters
                    .history_sink_failures
                    .fetch_add(1, Ordering::Relaxed);
                error!(key, count = bids.len(), error = %e, "history sink write failed");
            }
        }
    }

    /// One bounded batch: a single blocking pop, then immediate pops until
    /// the key runs dry or the batch is full.
    async fn pop_batch(&self, key: &str) -> Vec<String> {
        let first = match self.queue.blocking_pop(key, self.pop_timeout).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "blocking pop failed");
                return Vec::new();
            }
        };

        let mut batch = vec![first];
        while batch.len() < self.batch_size {
            match self.queue.pop(key).await {
                Ok(Some(payload)) => batch.push(payload),
                Ok(None) => break,
                Err(e) => {
                    warn!(key, error = %e, "batch pop failed");
                    break;
                }
            }
        }
        batch
    }

    async fn nap(&self, shutdown: &CancellationToken) {
        tokio::select! {
            _ = tokio::time::sleep(self.idle_sleep) => {}
            _ = shutdown.cancelled() => {}
        }
    }
}
