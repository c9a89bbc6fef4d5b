use async_trait::async_trait;

use crate::domain::Bid;
use crate::error::{AppError, RowScanError};

/// One page of bids plus the partial-scan outcome. Rows that fail to decode
/// are skipped, counted and reported through `scan_error` instead of sinking
/// the whole read.
#[derive(Debug, Default)]
pub struct BidPage {
    pub bids: Vec<Bid>,
    pub scan_error: Option<RowScanError>,
}

#[async_trait]
pub trait BidRepository: Send + Sync {
    /// Single-row insert using the intake-assigned id; echoes the stored id.
    async fn create_bid(&self, bid: &Bid) -> Result<i64, AppError>;

    /// Batched inserts under one transaction. Any row error rolls the whole
    /// batch back.
    async fn batch_create_bids(&self, bids: &[Bid]) -> Result<u64, AppError>;

    /// Bulk load through the store's COPY protocol; all-or-nothing.
    async fn bulk_copy_bids(&self, bids: &[Bid]) -> Result<u64, AppError>;

    /// Bids placed by `user_fp`, newest first.
    async fn fetch_bids_by_user_fp(
        &self,
        offset: i64,
        limit: i64,
        user_fp: &str,
    ) -> Result<BidPage, AppError>;

    /// Bids on one (asset, session), newest first.
    async fn fetch_bids_by_asset_and_session(
        &self,
        offset: i64,
        limit: i64,
        asset_id: &str,
        session_id: i64,
    ) -> Result<BidPage, AppError>;

    /// Total rows behind `fetch_bids_by_user_fp`, for page bookkeeping.
    async fn count_bids_by_user_fp(&self, user_fp: &str) -> Result<i64, AppError>;
}
