use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::domain::{NewSessionRequest, Session};
use crate::error::AppError;
use crate::id::IdGenerator;
use crate::logger::warn_if_slow;
use crate::session::repository::SessionRepository;

/// Session lifecycle operations above the repository: request validation,
/// id assignment and initial-status computation.
pub struct SessionService {
    repo: Arc<dyn SessionRepository>,
    ids: Arc<IdGenerator>,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionRepository>, ids: Arc<IdGenerator>) -> Self {
        Self { repo, ids }
    }

    #[instrument(skip(self, request), fields(asset_id = %request.asset_id))]
    pub async fn create_session(
        &self,
        request: NewSessionRequest,
        user_fp: &str,
    ) -> Result<Session, AppError> {
        let mut session = Session::from_request(self.ids.next_id(), request, user_fp)?;

        let stored_id = warn_if_slow("session_create", Duration::from_millis(250), async {
            self.repo.create(&session).await
        })
        .await?;
        session.id = stored_id;

        info!(
            session_id = %session.id,
            asset_id = %session.asset_id,
            status = session.status.as_str(),
            auction_type = session.auction_type.as_str(),
            "session created"
        );
        Ok(session)
    }

    /// The single session currently accepting bids on the asset.
    /// `NoActiveSession` surfaces to the bid intake, which converts it into a
    /// client-visible failed precondition.
    pub async fn get_active_asset_session(&self, asset_id: &str) -> Result<Session, AppError> {
        self.repo.find_active_session(asset_id).await
    }

    pub async fn find_by_id(&self, session_id: &str) -> Result<Session, AppError> {
        self.repo.find_by_id(session_id).await
    }

    pub async fn find_all_by_asset_id(&self, asset_id: &str) -> Result<Vec<Session>, AppError> {
        self.repo.find_all_by_asset_id(asset_id).await
    }
}
