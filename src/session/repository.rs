use async_trait::async_trait;

use crate::domain::Session;
use crate::error::AppError;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts within a transaction and returns the stored id. The
    /// transaction rolls back on any constraint violation.
    async fn create(&self, session: &Session) -> Result<String, AppError>;

    async fn find_by_id(&self, session_id: &str) -> Result<Session, AppError>;

    /// All sessions ever opened on the asset, newest first.
    async fn find_all_by_asset_id(&self, asset_id: &str) -> Result<Vec<Session>, AppError>;

    /// The unique session on the asset whose `end_time` is still in the
    /// future. Zero rows is `NoActiveSession`; two or more rows means the
    /// uniqueness invariant is broken and is reported as such rather than
    /// picking a winner.
    async fn find_active_session(&self, asset_id: &str) -> Result<Session, AppError>;
}
