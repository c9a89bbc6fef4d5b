use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{AuctionType, Session, SessionStatus};
use crate::error::AppError;
use crate::session::repository::SessionRepository;

/// Postgres-backed implementation of [`SessionRepository`]. Responsible only
/// for persistence and row mapping.
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SESSION_COLUMNS: &str = r#"
id, session_name, user_fp, asset_id, status, auction_type, auto_execute,
reserve_price, bid_increment_amount, current_highest_bid,
start_time, end_time, created_at
"#;

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: &Session) -> Result<String, AppError> {
        let id: i64 = session
            .id
            .parse()
            .map_err(|_| AppError::InvalidArgument(format!("malformed session id {:?}", session.id)))?;

        let mut tx = self.pool.begin().await?;

        let stored_id: i64 = sqlx::query_scalar(
            r#"
INSERT INTO sessions (id, session_name, user_fp, asset_id, status, auction_type, auto_execute,
                      reserve_price, bid_increment_amount, current_highest_bid,
                      start_time, end_time, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
RETURNING id
"#,
        )
        .bind(id)
        .bind(&session.name)
        .bind(&session.user_fp)
        .bind(&session.asset_id)
        .bind(session.status.as_str())
        .bind(session.auction_type.as_str())
        .bind(session.auto_execute)
        .bind(session.reserve_price)
        .bind(session.bid_increment_amount)
        .bind(session.current_highest_bid)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored_id.to_string())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Session, AppError> {
        let id: i64 = session_id
            .parse()
            .map_err(|_| AppError::NotFound(format!("session {session_id}")))?;

        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(row_to_session(&r)?),
            None => Err(AppError::NotFound(format!("session {session_id}"))),
        }
    }

    async fn find_all_by_asset_id(&self, asset_id: &str) -> Result<Vec<Session>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE asset_id = $1 ORDER BY created_at DESC"
        ))
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = Vec::with_capacity(rows.len());
        for r in &rows {
            sessions.push(row_to_session(r)?);
        }
        Ok(sessions)
    }

    async fn find_active_session(&self, asset_id: &str) -> Result<Session, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE asset_id = $1 AND end_time > NOW()"
        ))
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        match rows.len() {
            0 => Err(AppError::NoActiveSession(asset_id.to_string())),
            1 => Ok(row_to_session(&rows[0])?),
            count => Err(AppError::ActiveSessionInvariant {
                asset_id: asset_id.to_string(),
                count,
            }),
        }
    }
}

fn row_to_session(r: &PgRow) -> Result<Session, sqlx::Error> {
    let status: String = r.try_get("status")?;
    let auction_type: String = r.try_get("auction_type")?;
    Ok(Session {
        id: r.try_get::<i64, _>("id")?.to_string(),
        name: r.try_get("session_name")?,
        user_fp: r.try_get("user_fp")?,
        asset_id: r.try_get("asset_id")?,
        status: status
            .parse::<SessionStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        auction_type: auction_type
            .parse::<AuctionType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        auto_execute: r.try_get("auto_execute")?,
        reserve_price: r.try_get("reserve_price")?,
        bid_increment_amount: r.try_get("bid_increment_amount")?,
        current_highest_bid: r.try_get("current_highest_bid")?,
        start_time: r.try_get("start_time")?,
        end_time: r.try_get("end_time")?,
        created_at: r.try_get("created_at")?,
    })
}
