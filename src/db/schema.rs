use sqlx::PgPool;

pub async fn migrate_relational(pool: &PgPool) -> anyhow::Result<()> {
    // Sessions
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS sessions (
  id BIGINT PRIMARY KEY,
  session_name TEXT NOT NULL,
  user_fp TEXT NOT NULL,
  asset_id TEXT NOT NULL,
  status TEXT NOT NULL,
  auction_type TEXT NOT NULL,
  auto_execute BOOLEAN NOT NULL,
  reserve_price DOUBLE PRECISION NOT NULL,
  bid_increment_amount DOUBLE PRECISION NOT NULL,
  current_highest_bid DOUBLE PRECISION NOT NULL,
  start_time TIMESTAMPTZ NOT NULL,
  end_time TIMESTAMPTZ NOT NULL,
  created_at TIMESTAMPTZ NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    // Current-state bid rows, keyed by the intake-assigned id
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS asset_bid (
  id BIGINT PRIMARY KEY,
  accepted BOOLEAN NOT NULL,
  status TEXT NOT NULL,
  asset_id TEXT NOT NULL,
  amount DOUBLE PRECISION NOT NULL,
  placed_by TEXT NOT NULL,
  session_id BIGINT NOT NULL,
  last_until TIMESTAMPTZ NOT NULL,
  placed_at TIMESTAMPTZ NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_sessions_asset_end ON sessions(asset_id, end_time);"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_asset_bid_placed_by ON asset_bid(placed_by, placed_at DESC);"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_asset_bid_session ON asset_bid(asset_id, session_id, placed_at DESC);"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn migrate_timeseries(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS bid_records (
  id BIGINT NOT NULL,
  symbol TEXT NOT NULL,
  is_accepted BOOLEAN NOT NULL,
  asset_id TEXT NOT NULL,
  bidder_fp TEXT NOT NULL,
  seller_fp TEXT NOT NULL,
  bid_time TIMESTAMPTZ NOT NULL,
  session_id BIGINT NOT NULL,
  amount DOUBLE PRECISION NOT NULL,
  quantity DOUBLE PRECISION NOT NULL,
  expiration_time TIMESTAMPTZ NOT NULL,
  UNIQUE (id, bid_time)
);
"#,
    )
    .execute(pool)
    .await?;

    // Partition on bid_time where the extension is available; a plain table
    // still satisfies every query the history sink issues.
    if let Err(e) = sqlx::query("CREATE EXTENSION IF NOT EXISTS timescaledb;")
        .execute(pool)
        .await
    {
        tracing::warn!(error = %e, "timescaledb extension unavailable; bid_records stays unpartitioned");
        return Ok(());
    }

    if let Err(e) =
        sqlx::query("SELECT create_hypertable('bid_records', 'bid_time', if_not_exists => TRUE);")
            .execute(pool)
            .await
    {
        tracing::warn!(error = %e, "create_hypertable failed; bid_records stays unpartitioned");
    }

    Ok(())
}
