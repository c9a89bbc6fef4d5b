use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::debug;

use crate::domain::{self, NewSessionRequest};
use crate::generated::session::v1::session_service_server::SessionService as SessionServiceApi;
use crate::generated::session::v1::{
    CreateSessionRequest, CreateSessionResponse, GetActiveAssetSessionRequest,
    GetActiveAssetSessionResponse, SessionResponse,
};
use crate::server::{USER_FP_HEADER, status_from_app_error};
use crate::session::service::SessionService;
use crate::time::{from_proto_timestamp, to_proto_timestamp};

/// gRPC facade over [`SessionService`].
pub struct SessionRpc {
    sessions: Arc<SessionService>,
}

impl SessionRpc {
    pub fn new(sessions: Arc<SessionService>) -> Self {
        Self { sessions }
    }
}

#[tonic::async_trait]
impl SessionServiceApi for SessionRpc {
    async fn create_session(
        self: Arc<Self>,
        request: Request<CreateSessionRequest>,
    ) -> Result<Response<CreateSessionResponse>, Status> {
        // Session creation is an owner operation; an absent header just means
        // an anonymous owner fingerprint.
        let user_fp = request
            .metadata()
            .get(USER_FP_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let req = request.into_inner();

        let auction_type = req
            .auction_type
            .parse::<domain::AuctionType>()
            .map_err(status_from_app_error)?;
        let start_time = req
            .start_time
            .as_ref()
            .and_then(from_proto_timestamp)
            .ok_or_else(|| Status::invalid_argument("startTime is required"))?;
        let end_time = req
            .end_time
            .as_ref()
            .and_then(from_proto_timestamp)
            .ok_or_else(|| Status::invalid_argument("endTime is required"))?;

        debug!(asset_id = %req.asset_id, auction_type = %auction_type, "create session request");

        let session = self
            .sessions
            .create_session(
                NewSessionRequest {
                    asset_id: req.asset_id,
                    name: req.name.unwrap_or_default(),
                    auction_type,
                    auto_execute: req.auto_execute,
                    start_time,
                    end_time,
                    reserve_price: f64::from(req.reserve_price),
                    bid_increment_amount: f64::from(req.bid_increment_amount),
                },
                &user_fp,
            )
            .await
            .map_err(status_from_app_error)?;

        Ok(Response::new(CreateSessionResponse {
            session: Some(to_session_response(&session)),
        }))
    }

    async fn get_active_asset_session(
        self: Arc<Self>,
        request: Request<GetActiveAssetSessionRequest>,
    ) -> Result<Response<GetActiveAssetSessionResponse>, Status> {
        let req = request.into_inner();
        let session = self
            .sessions
            .get_active_asset_session(&req.asset_id)
            .await
            .map_err(status_from_app_error)?;

        Ok(Response::new(GetActiveAssetSessionResponse {
            session: Some(to_session_response(&session)),
        }))
    }
}

fn to_session_response(session: &domain::Session) -> SessionResponse {
    SessionResponse {
        session_id: session.id.clone(),
        name: (!session.name.is_empty()).then(|| session.name.clone()),
        asset_id: session.asset_id.clone(),
        status: session.status.as_str().to_string(),
        auction_type: session.auction_type.as_str().to_string(),
        auto_execute: session.auto_execute,
        reserve_price: session.reserve_price as f32,
        bid_increment_amount: session.bid_increment_amount as f32,
        current_highest_bid: session.current_highest_bid as f32,
        start_time: Some(to_proto_timestamp(session.start_time)),
        end_time: Some(to_proto_timestamp(session.end_time)),
        created_at: Some(to_proto_timestamp(session.created_at)),
    }
}
