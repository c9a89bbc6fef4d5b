pub mod bid_service;
pub mod session_service;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tonic::Status;
use tonic::transport::Server;
use tracing::{error, info};

use crate::error::AppError;
use crate::generated::bid::v1::bid_service_server::BidServiceServer;
use crate::generated::session::v1::session_service_server::SessionServiceServer;

pub use bid_service::BidRpc;
pub use session_service::SessionRpc;

/// Metadata header carrying the trusted caller fingerprint. Populated by the
/// authentication boundary in front of this service.
pub const USER_FP_HEADER: &str = "x-rfz-user";

pub async fn serve_grpc(
    addr: &str,
    bid_rpc: BidRpc,
    session_rpc: SessionRpc,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = addr.parse()?;
    info!(%addr, "grpc server started");

    Server::builder()
        .add_service(BidServiceServer::from_arc(Arc::new(bid_rpc)))
        .add_service(SessionServiceServer::from_arc(Arc::new(session_rpc)))
        .serve_with_shutdown(addr, shutdown.cancelled_owned())
        .await?;

    info!("grpc server stopped");
    Ok(())
}

/// Maps core errors onto status codes. Internal detail (SQL states, decode
/// errors) stays on the server side of the boundary.
pub fn status_from_app_error(err: AppError) -> Status {
    match err {
        AppError::InvalidArgument(message) => Status::invalid_argument(message),
        AppError::Unauthenticated => Status::unauthenticated("missing caller identity"),
        AppError::NoActiveSession(asset_id) => {
            Status::failed_precondition(format!("no active auction for asset {asset_id}"))
        }
        AppError::ActiveSessionInvariant { asset_id, count } => {
            error!(asset_id, count, "active-session uniqueness invariant violated");
            Status::internal("session state is inconsistent")
        }
        AppError::NotFound(what) => Status::not_found(what),
        AppError::Store(e) => {
            error!(error = %e, "store call failed");
            Status::internal("store unavailable")
        }
        AppError::Queue(e) => {
            error!(error = %e, "queue call failed");
            // Redis refusing writes under memory pressure is the documented
            // backpressure signal; everything else is an internal fault.
            if e.to_string().contains("OOM") {
                Status::unavailable("bid queue is saturated")
            } else {
                Status::internal("bid queue unavailable")
            }
        }
        AppError::Encoding(e) => {
            error!(error = %e, "payload encoding failed");
            Status::internal("encoding failure")
        }
        AppError::Cancelled => Status::cancelled("request cancelled"),
    }
}
