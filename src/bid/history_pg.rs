use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolCopyExt, PgRow};
use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::bid::history::BidHistoryRepository;
use crate::bid::repository::BidPage;
use crate::domain::{Bid, BidStatus};
use crate::error::{AppError, RowScanError};

/// Time-series implementation of [`BidHistoryRepository`] over the
/// `bid_records` table.
pub struct PgBidHistoryRepository {
    pool: PgPool,
}

impl PgBidHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn copy_records(&self, bids: &[Bid]) -> Result<u64, sqlx::Error> {
        let mut copy = self
            .pool
            .copy_in_raw(&format!(
                "COPY bid_records ({RECORD_COLUMNS}) FROM STDIN WITH (FORMAT csv)"
            ))
            .await?;

        let mut payload = String::new();
        for bid in bids {
            encode_record_csv(bid, &mut payload);
        }
        copy.send(payload.as_bytes()).await?;
        copy.finish().await
    }

    /// Duplicate-tolerant fallback once COPY has hit a unique violation.
    async fn insert_skipping_duplicates(&self, bids: &[Bid]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for bid in bids {
            let result = sqlx::query(
                r#"
INSERT INTO bid_records (id, symbol, is_accepted, asset_id, bidder_fp, seller_fp, bid_time,
                         session_id, amount, quantity, expiration_time)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
ON CONFLICT (id, bid_time) DO NOTHING
"#,
            )
            .bind(bid.id)
            .bind(&bid.symbol)
            .bind(bid.accepted)
            .bind(&bid.asset_id)
            .bind(&bid.user_fp)
            .bind(&bid.asset_owner)
            .bind(bid.placed_at)
            .bind(bid.session_id)
            .bind(bid.amount)
            .bind(bid.quantity)
            .bind(bid.last_until)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

const RECORD_COLUMNS: &str = "id, symbol, is_accepted, asset_id, bidder_fp, seller_fp, bid_time, \
                              session_id, amount, quantity, expiration_time";

#[async_trait]
impl BidHistoryRepository for PgBidHistoryRepository {
    async fn save_bid(&self, bid: &Bid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
INSERT INTO bid_records (id, symbol, is_accepted, asset_id, bidder_fp, seller_fp, bid_time,
                         session_id, amount, quantity, expiration_time)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#,
        )
        .bind(bid.id)
        .bind(&bid.symbol)
        .bind(bid.accepted)
        .bind(&bid.asset_id)
        .bind(&bid.user_fp)
        .bind(&bid.asset_owner)
        .bind(bid.placed_at)
        .bind(bid.session_id)
        .bind(bid.amount)
        .bind(bid.quantity)
        .bind(bid.last_until)
        .execute(&self.pool)
        .await?;

        info!(rows = result.rows_affected(), bid_id = bid.id, "saved bid record");
        Ok(())
    }

    async fn batch_save(&self, bids: &[Bid]) -> Result<u64, AppError> {
        if bids.is_empty() {
            return Ok(0);
        }

        match self.copy_records(bids).await {
            Ok(rows) => Ok(rows),
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    rows = bids.len(),
                    error = %e,
                    "duplicate bid record in batch; re-driving with duplicate skip"
                );
                self.insert_skipping_duplicates(bids).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_bids_in_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BidPage, AppError> {
        if start > end {
            return Err(AppError::InvalidArgument(format!(
                "range start {start} is after end {end}"
            )));
        }

        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM bid_records \
             WHERE bid_time >= $1 AND bid_time <= $2 ORDER BY bid_time"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut bids = Vec::with_capacity(rows.len());
        let mut skip_count = 0u64;
        let mut last_err = None;
        for r in &rows {
            match row_to_record(r) {
                Ok(bid) => bids.push(bid),
                Err(e) => {
                    warn!(error = %e, "skipping undecodable bid record");
                    skip_count += 1;
                    last_err = Some(e);
                }
            }
        }
        Ok(BidPage {
            bids,
            scan_error: last_err.map(|source| RowScanError { skip_count, source }),
        })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn row_to_record(r: &PgRow) -> Result<Bid, sqlx::Error> {
    let accepted: bool = r.try_get("is_accepted")?;
    Ok(Bid {
        id: r.try_get("id")?,
        symbol: r.try_get("symbol")?,
        accepted,
        // The history table stores acceptance, not the full status ladder.
        status: if accepted {
            BidStatus::Accepted
        } else {
            BidStatus::Pending
        },
        asset_id: r.try_get("asset_id")?,
        user_fp: r.try_get("bidder_fp")?,
        asset_owner: r.try_get("seller_fp")?,
        placed_at: r.try_get("bid_time")?,
        session_id: r.try_get("session_id")?,
        amount: r.try_get("amount")?,
        quantity: r.try_get("quantity")?,
        last_until: r.try_get("expiration_time")?,
    })
}

fn encode_record_csv(bid: &Bid, out: &mut String) {
    use std::fmt::Write;

    let _ = writeln!(
        out,
        "{},{},{},{},{},{},{},{},{},{},{}",
        bid.id,
        csv_field(&bid.symbol),
        bid.accepted,
        csv_field(&bid.asset_id),
        csv_field(&bid.user_fp),
        csv_field(&bid.asset_owner),
        csv_field(&bid.placed_at.to_rfc3339()),
        bid.session_id,
        bid.amount,
        bid.quantity,
        csv_field(&bid.last_until.to_rfc3339()),
    );
}

fn csv_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
