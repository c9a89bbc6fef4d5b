use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::bid::queue::BidQueue;
use crate::error::AppError;

/// Redis-backed [`BidQueue`]: RPUSH at the tail, BLPOP at the head, SCAN for
/// key discovery. One logical client; the connection manager multiplexes and
/// reconnects underneath.
#[derive(Clone)]
pub struct RedisBidQueue {
    manager: ConnectionManager,
}

impl RedisBidQueue {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl BidQueue for RedisBidQueue {
    async fn push(&self, key: &str, payload: &str) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let _len: i64 = conn.rpush(key, payload).await?;
        Ok(())
    }

    async fn blocking_pop(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<String>, AppError> {
        let mut conn = self.manager.clone();
        let popped: Option<(String, String)> = conn.blpop(key, timeout.as_secs_f64()).await?;
        Ok(popped.map(|(_key, payload)| payload))
    }

    async fn pop(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.manager.clone();
        let popped: Option<String> = conn.lpop(key, None).await?;
        Ok(popped)
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.manager.clone();
        let mut keys = Vec::new();
        let mut iter: redis::AsyncIter<String> = conn.scan_match(pattern).await?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }
}
