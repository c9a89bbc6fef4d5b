pub mod schema;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Relational store handle. Constructed once at startup and passed into the
/// repositories; the pool hands out connections per call.
#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
}

impl Db {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        schema::migrate_relational(&self.pool).await
    }
}

/// Time-series store handle. Separate pool so history writes cannot starve
/// the hot relational path.
#[derive(Clone)]
pub struct TimeseriesDb {
    pub pool: PgPool,
}

impl TimeseriesDb {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        schema::migrate_timeseries(&self.pool).await
    }
}
