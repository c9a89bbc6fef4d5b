use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;

/// Write-ahead queue between bid intake and the drain worker. One FIFO list
/// per (asset, session); strictly ordered within a key, unordered across
/// keys. Acknowledged bids live here until drained, so the backing store's
/// durability is the acknowledged durability floor.
#[async_trait]
pub trait BidQueue: Send + Sync {
    /// Appends at the tail of the key's list.
    async fn push(&self, key: &str, payload: &str) -> Result<(), AppError>;

    /// Pops from the head, waiting up to `timeout` for an element.
    async fn blocking_pop(&self, key: &str, timeout: Duration)
    -> Result<Option<String>, AppError>;

    /// Non-blocking head pop, used to drain a batch after the first
    /// blocking pop has produced an element.
    async fn pop(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Keys currently holding queued bids, matched against a glob pattern.
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, AppError>;
}

/// Queue key for one session's bids: `bid_<assetId>_<endMillis>_<sessionId>`.
/// The end time keeps keys from colliding across consecutive sessions on the
/// same asset.
pub fn bid_queue_key(asset_id: &str, session_end: DateTime<Utc>, session_id: i64) -> String {
    format!(
        "bid_{}_{}_{}",
        asset_id,
        session_end.timestamp_millis(),
        session_id
    )
}
