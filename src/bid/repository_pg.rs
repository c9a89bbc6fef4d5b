use async_trait::async_trait;
use sqlx::postgres::{PgPoolCopyExt, PgRow};
use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::bid::repository::{BidPage, BidRepository};
use crate::domain::{Bid, BidStatus};
use crate::error::{AppError, RowScanError};

/// Postgres-backed implementation of [`BidRepository`] over the `asset_bid`
/// table.
pub struct PgBidRepository {
    pool: PgPool,
}

impl PgBidRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BID_COLUMNS: &str =
    "id, accepted, status, asset_id, amount, placed_by, session_id, last_until, placed_at";

#[async_trait]
impl BidRepository for PgBidRepository {
    async fn create_bid(&self, bid: &Bid) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
INSERT INTO asset_bid (id, accepted, status, asset_id, amount, placed_by, session_id, last_until, placed_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING id
"#,
        )
        .bind(bid.id)
        .bind(bid.accepted)
        .bind(bid.status.as_str())
        .bind(&bid.asset_id)
        .bind(bid.amount)
        .bind(&bid.user_fp)
        .bind(bid.session_id)
        .bind(bid.last_until)
        .bind(bid.placed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn batch_create_bids(&self, bids: &[Bid]) -> Result<u64, AppError> {
        if bids.is_empty() {
            return Ok(0);
        }
        info!(rows = bids.len(), "batch creating bids");

        let mut tx = self.pool.begin().await?;
        for bid in bids {
            sqlx::query(
                r#"
INSERT INTO asset_bid (id, accepted, status, asset_id, amount, placed_by, session_id, last_until, placed_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
"#,
            )
            .bind(bid.id)
            .bind(bid.accepted)
            .bind(bid.status.as_str())
            .bind(&bid.asset_id)
            .bind(bid.amount)
            .bind(&bid.user_fp)
            .bind(bid.session_id)
            .bind(bid.last_until)
            .bind(bid.placed_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(bids.len() as u64)
    }

    async fn bulk_copy_bids(&self, bids: &[Bid]) -> Result<u64, AppError> {
        if bids.is_empty() {
            return Ok(0);
        }
        info!(rows = bids.len(), "bulk copying bids");

        let mut copy = self
            .pool
            .copy_in_raw(&format!(
                "COPY asset_bid ({BID_COLUMNS}) FROM STDIN WITH (FORMAT csv)"
            ))
            .await?;

        let mut payload = String::new();
        for bid in bids {
            encode_bid_csv(bid, &mut payload);
        }
        copy.send(payload.as_bytes()).await?;
        let rows = copy.finish().await?;

        Ok(rows)
    }

    async fn fetch_bids_by_user_fp(
        &self,
        offset: i64,
        limit: i64,
        user_fp: &str,
    ) -> Result<BidPage, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {BID_COLUMNS} FROM asset_bid WHERE placed_by = $1 \
             ORDER BY placed_at DESC OFFSET $2 LIMIT $3"
        ))
        .bind(user_fp)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows_to_page(&rows))
    }

    async fn fetch_bids_by_asset_and_session(
        &self,
        offset: i64,
        limit: i64,
        asset_id: &str,
        session_id: i64,
    ) -> Result<BidPage, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {BID_COLUMNS} FROM asset_bid WHERE asset_id = $1 AND session_id = $2 \
             ORDER BY placed_at DESC OFFSET $3 LIMIT $4"
        ))
        .bind(asset_id)
        .bind(session_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows_to_page(&rows))
    }

    async fn count_bids_by_user_fp(&self, user_fp: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM asset_bid WHERE placed_by = $1")
            .bind(user_fp)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Maps rows, skipping (and counting) any that fail to decode.
fn rows_to_page(rows: &[PgRow]) -> BidPage {
    let mut bids = Vec::with_capacity(rows.len());
    let mut skip_count = 0u64;
    let mut last_err = None;
    for r in rows {
        match row_to_bid(r) {
            Ok(bid) => bids.push(bid),
            Err(e) => {
                warn!(error = %e, "skipping undecodable bid row");
                skip_count += 1;
                last_err = Some(e);
            }
        }
    }
    BidPage {
        bids,
        scan_error: last_err.map(|source| RowScanError { skip_count, source }),
    }
}

fn row_to_bid(r: &PgRow) -> Result<Bid, sqlx::Error> {
    let status: String = r.try_get("status")?;
    let asset_id: String = r.try_get("asset_id")?;
    Ok(Bid {
        id: r.try_get("id")?,
        accepted: r.try_get("accepted")?,
        status: status
            .parse::<BidStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        symbol: asset_id.clone(),
        asset_id,
        amount: r.try_get("amount")?,
        quantity: 1.0,
        user_fp: r.try_get("placed_by")?,
        asset_owner: String::new(),
        session_id: r.try_get("session_id")?,
        last_until: r.try_get("last_until")?,
        placed_at: r.try_get("placed_at")?,
    })
}

fn encode_bid_csv(bid: &Bid, out: &mut String) {
    use std::fmt::Write;

    let _ = writeln!(
        out,
        "{},{},{},{},{},{},{},{},{}",
        bid.id,
        bid.accepted,
        csv_field(bid.status.as_str()),
        csv_field(&bid.asset_id),
        bid.amount,
        csv_field(&bid.user_fp),
        bid.session_id,
        csv_field(&bid.last_until.to_rfc3339()),
        csv_field(&bid.placed_at.to_rfc3339()),
    );
}

/// Quotes a CSV field for the COPY payload; embedded quotes are doubled.
fn csv_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
