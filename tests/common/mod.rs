//! In-memory doubles for the queue and the stores, mirroring the shapes the
//! real Redis/Postgres implementations expose.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use rfz_auction::bid::history::BidHistoryRepository;
use rfz_auction::bid::queue::BidQueue;
use rfz_auction::bid::repository::{BidPage, BidRepository};
use rfz_auction::domain::{Bid, Session};
use rfz_auction::error::AppError;
use rfz_auction::session::repository::SessionRepository;

/// FIFO lists in memory with the same push/pop surface as the Redis queue.
#[derive(Default)]
pub struct MemoryBidQueue {
    lists: Mutex<HashMap<String, VecDeque<String>>>,
    pub fail_pushes: Mutex<bool>,
}

impl MemoryBidQueue {
    pub fn len(&self, key: &str) -> usize {
        self.lists.lock().get(key).map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl BidQueue for MemoryBidQueue {
    async fn push(&self, key: &str, payload: &str) -> Result<(), AppError> {
        if *self.fail_pushes.lock() {
            return Err(AppError::Queue(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "queue is down",
            ))));
        }
        self.lists
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(payload.to_string());
        Ok(())
    }

    async fn blocking_pop(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<String>, AppError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(payload) = self.lists.lock().get_mut(key).and_then(VecDeque::pop_front) {
                return Ok(Some(payload));
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn pop(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lists.lock().get_mut(key).and_then(VecDeque::pop_front))
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, AppError> {
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .lists
            .lock()
            .iter()
            .filter(|(key, list)| key.starts_with(prefix) && !list.is_empty())
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Records everything written; optionally fails bulk copies to exercise the
/// worker's partial-failure path.
#[derive(Default)]
pub struct MockBidRepository {
    pub saved: Mutex<Vec<Bid>>,
    pub fail_bulk_copy: Mutex<bool>,
    pub fetch_pages: Mutex<VecDeque<Vec<Bid>>>,
    /// Served once `fetch_pages` runs dry; keeps a paging caller going
    /// forever instead of handing it the terminating empty page.
    pub repeat_page: Mutex<Option<Vec<Bid>>>,
    pub fetch_offsets: Mutex<Vec<i64>>,
    pub total: Mutex<i64>,
}

impl MockBidRepository {
    fn next_page(&self) -> Vec<Bid> {
        self.fetch_pages
            .lock()
            .pop_front()
            .or_else(|| self.repeat_page.lock().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BidRepository for MockBidRepository {
    async fn create_bid(&self, bid: &Bid) -> Result<i64, AppError> {
        self.saved.lock().push(bid.clone());
        Ok(bid.id)
    }

    async fn batch_create_bids(&self, bids: &[Bid]) -> Result<u64, AppError> {
        self.saved.lock().extend_from_slice(bids);
        Ok(bids.len() as u64)
    }

    async fn bulk_copy_bids(&self, bids: &[Bid]) -> Result<u64, AppError> {
        if *self.fail_bulk_copy.lock() {
            return Err(AppError::Store(sqlx::Error::PoolTimedOut));
        }
        self.saved.lock().extend_from_slice(bids);
        Ok(bids.len() as u64)
    }

    async fn fetch_bids_by_user_fp(
        &self,
        offset: i64,
        _limit: i64,
        _user_fp: &str,
    ) -> Result<BidPage, AppError> {
        self.fetch_offsets.lock().push(offset);
        Ok(BidPage {
            bids: self.next_page(),
            scan_error: None,
        })
    }

    async fn fetch_bids_by_asset_and_session(
        &self,
        offset: i64,
        _limit: i64,
        _asset_id: &str,
        _session_id: i64,
    ) -> Result<BidPage, AppError> {
        self.fetch_offsets.lock().push(offset);
        Ok(BidPage {
            bids: self.next_page(),
            scan_error: None,
        })
    }

    async fn count_bids_by_user_fp(&self, _user_fp: &str) -> Result<i64, AppError> {
        Ok(*self.total.lock())
    }
}

/// Duplicate-tolerant history sink: re-driving a `(id, bid_time)` pair leaves
/// the stored set unchanged, like the unique constraint underneath the real
/// one.
#[derive(Default)]
pub struct MockHistoryRepository {
    pub saved: Mutex<Vec<Bid>>,
    seen: Mutex<HashSet<(i64, DateTime<Utc>)>>,
    pub fail_batches: Mutex<bool>,
}

#[async_trait]
impl BidHistoryRepository for MockHistoryRepository {
    async fn save_bid(&self, bid: &Bid) -> Result<(), AppError> {
        self.batch_save(std::slice::from_ref(bid)).await?;
        Ok(())
    }

    async fn batch_save(&self, bids: &[Bid]) -> Result<u64, AppError> {
        if *self.fail_batches.lock() {
            return Err(AppError::Store(sqlx::Error::PoolTimedOut));
        }
        let mut inserted = 0;
        for bid in bids {
            if self.seen.lock().insert((bid.id, bid.placed_at)) {
                self.saved.lock().push(bid.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn find_bids_in_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BidPage, AppError> {
        if start > end {
            return Err(AppError::InvalidArgument("start is after end".into()));
        }
        let bids = self
            .saved
            .lock()
            .iter()
            .filter(|b| b.placed_at >= start && b.placed_at <= end)
            .cloned()
            .collect();
        Ok(BidPage {
            bids,
            scan_error: None,
        })
    }
}

/// Sessions in memory with the same active-session semantics as the store:
/// zero rows is `NoActiveSession`, two or more is the invariant error.
#[derive(Default)]
pub struct MockSessionRepository {
    pub sessions: Mutex<Vec<Session>>,
}

impl MockSessionRepository {
    pub fn with_session(session: Session) -> Self {
        Self {
            sessions: Mutex::new(vec![session]),
        }
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn create(&self, session: &Session) -> Result<String, AppError> {
        self.sessions.lock().push(session.clone());
        Ok(session.id.clone())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Session, AppError> {
        self.sessions
            .lock()
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))
    }

    async fn find_all_by_asset_id(&self, asset_id: &str) -> Result<Vec<Session>, AppError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .iter()
            .filter(|s| s.asset_id == asset_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn find_active_session(&self, asset_id: &str) -> Result<Session, AppError> {
        let now = Utc::now();
        let active: Vec<Session> = self
            .sessions
            .lock()
            .iter()
            .filter(|s| s.asset_id == asset_id && s.end_time > now)
            .cloned()
            .collect();
        match active.len() {
            0 => Err(AppError::NoActiveSession(asset_id.to_string())),
            1 => Ok(active.into_iter().next().unwrap()),
            count => Err(AppError::ActiveSessionInvariant {
                asset_id: asset_id.to_string(),
                count,
            }),
        }
    }
}
