use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::bid::repository::BidPage;
use crate::domain::Bid;
use crate::error::AppError;

/// Append-only record of every bid, keyed by `(id, bid_time)` in the
/// time-series store. The queue delivers at-least-once, so this sink must
/// absorb duplicates; re-driving a batch leaves the table unchanged.
#[async_trait]
pub trait BidHistoryRepository: Send + Sync {
    async fn save_bid(&self, bid: &Bid) -> Result<(), AppError>;

    /// Bulk-copies the batch. A unique violation on `(id, bid_time)` is
    /// logged and absorbed; any other error aborts.
    async fn batch_save(&self, bids: &[Bid]) -> Result<u64, AppError>;

    /// History rows with `start <= bid_time <= end`. Requires `start <= end`.
    async fn find_bids_in_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BidPage, AppError>;
}
