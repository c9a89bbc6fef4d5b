use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::codegen::tokio_stream::Stream;
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::bid::queue::{BidQueue, bid_queue_key};
use crate::bid::repository::BidRepository;
use crate::domain::Bid;
use crate::generated::bid::v1::bid_service_server::BidService as BidServiceApi;
use crate::generated::bid::v1::{
    BidRecord, CreateBidRequest, CreateBidResponse, GetUserBidRequest, GetUserBidResponse,
    StreamOpenBidsRequest, StreamOpenBidsResponse,
};
use crate::id::IdGenerator;
use crate::metrics::counters::Counters;
use crate::server::{USER_FP_HEADER, status_from_app_error};
use crate::session::service::SessionService;
use crate::socket::hub::{BidEvent, HubHandle};
use crate::time::{from_proto_timestamp, to_proto_timestamp};

/// Upper bound on `GetUserBid` page size.
const MAX_USER_BID_LIMIT: i64 = 100;
/// Upper bound on `StreamOpenBids` page size.
const MAX_STREAM_LIMIT: i64 = 200;
/// Deadline on each store read behind a client-facing call.
const STORE_READ_DEADLINE: Duration = Duration::from_secs(10);
/// Bids are offers on the asset itself, one lot at a time.
const DEFAULT_BID_QUANTITY: f64 = 1.0;

/// Bid intake and lookup RPCs. The acknowledgement to the caller is made
/// once the bid sits in the cache queue; the drain worker owns the durable
/// write.
pub struct BidRpc {
    sessions: Arc<SessionService>,
    bids: Arc<dyn BidRepository>,
    queue: Arc<dyn BidQueue>,
    hub: HubHandle,
    ids: Arc<IdGenerator>,
    counters: Counters,
    shutdown: CancellationToken,
}

impl BidRpc {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<SessionService>,
        bids: Arc<dyn BidRepository>,
        queue: Arc<dyn BidQueue>,
        hub: HubHandle,
        ids: Arc<IdGenerator>,
        counters: Counters,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            sessions,
            bids,
            queue,
            hub,
            ids,
            counters,
            shutdown,
        }
    }
}

#[tonic::async_trait]
impl BidServiceApi for BidRpc {
    async fn create_bid(
        self: Arc<Self>,
        request: Request<CreateBidRequest>,
    ) -> Result<Response<CreateBidResponse>, Status> {
        let user_fp = required_user_fp(request.metadata())?;
        let req = request.into_inner();

        if req.amount <= 0.0 {
            return Err(Status::invalid_argument("amount must be positive"));
        }
        let last_until = req
            .last_until
            .as_ref()
            .and_then(from_proto_timestamp)
            .ok_or_else(|| Status::invalid_argument("lastUntil is required"))?;

        let session = self
            .sessions
            .get_active_asset_session(&req.asset_id)
            .await
            .map_err(status_from_app_error)?;
        let session_id: i64 = session
            .id
            .parse()
            .map_err(|_| Status::internal("session state is inconsistent"))?;

        let bid = Bid::new(
            self.ids.next_id(),
            user_fp.as_str(),
            f64::from(req.amount),
            DEFAULT_BID_QUANTITY,
            req.asset_id.as_str(),
            session.user_fp.as_str(),
            last_until,
            session_id,
        )
        .map_err(status_from_app_error)?;

        let payload = serde_json::to_string(&bid)
            .map_err(|e| status_from_app_error(e.into()))?;
        let key = bid_queue_key(&req.asset_id, session.end_time, session_id);
        self.queue
            .push(&key, &payload)
            .await
            .map_err(status_from_app_error)?;
        self.counters.bids_enqueued.fetch_add(1, Ordering::Relaxed);

        // Best-effort live update; the queue is the durability frontier.
        match serde_json::to_string(&BidEvent {
            asset_id: bid.asset_id.clone(),
            bid: bid.clone(),
        }) {
            Ok(event) => self.hub.broadcast(event),
            Err(e) => warn!(error = %e, "failed to encode bid event"),
        }

        info!(
            bid_id = bid.id,
            asset_id = %bid.asset_id,
            session_id,
            "bid acknowledged"
        );

        Ok(Response::new(CreateBidResponse {
            bid_id: bid.id,
            asset_id: bid.asset_id,
            session_id,
            amount: bid.amount as f32,
            quantity: bid.quantity as f32,
            last_until: Some(to_proto_timestamp(bid.last_until)),
        }))
    }

    async fn get_user_bid(
        self: Arc<Self>,
        request: Request<GetUserBidRequest>,
    ) -> Result<Response<GetUserBidResponse>, Status> {
        let req = request.into_inner();

        if req.user_fp.is_empty() {
            return Err(Status::invalid_argument("userFp is required"));
        }
        if req.offset < 0 {
            return Err(Status::invalid_argument("offset must not be negative"));
        }
        if req.limit < 1 || req.limit > MAX_USER_BID_LIMIT {
            return Err(Status::invalid_argument(format!(
                "limit must be between 1 and {MAX_USER_BID_LIMIT}"
            )));
        }

        let page = tokio::time::timeout(
            STORE_READ_DEADLINE,
            self.bids.fetch_bids_by_user_fp(req.offset, req.limit, &req.user_fp),
        )
        .await
        .map_err(|_| Status::deadline_exceeded("store read timed out"))?
        .map_err(status_from_app_error)?;

        if let Some(scan) = &page.scan_error {
            warn!(user_fp = %req.user_fp, skipped = scan.skip_count, "bid rows skipped during scan");
            self.counters
                .rows_skipped_scan
                .fetch_add(scan.skip_count, Ordering::Relaxed);
        }

        let total_results = tokio::time::timeout(
            STORE_READ_DEADLINE,
            self.bids.count_bids_by_user_fp(&req.user_fp),
        )
        .await
        .map_err(|_| Status::deadline_exceeded("store read timed out"))?
        .map_err(status_from_app_error)?;

        let bids: Vec<BidRecord> = page.bids.iter().map(to_bid_record).collect();
        Ok(Response::new(GetUserBidResponse {
            row_count: bids.len() as i64,
            bids,
            offset: req.offset,
            total_results,
        }))
    }

    type StreamOpenBidsStream =
        Pin<Box<dyn Stream<Item = Result<StreamOpenBidsResponse, Status>> + Send + 'static>>;

    async fn stream_open_bids(
        self: Arc<Self>,
        request: Request<StreamOpenBidsRequest>,
    ) -> Result<Response<Self::StreamOpenBidsStream>, Status> {
        let req = request.into_inner();

        if req.offset < 0 {
            return Err(Status::invalid_argument("offset must not be negative"));
        }
        if req.limit < 1 || req.limit > MAX_STREAM_LIMIT {
            return Err(Status::invalid_argument(format!(
                "limit must be between 1 and {MAX_STREAM_LIMIT}"
            )));
        }

        let session = self
            .sessions
            .get_active_asset_session(&req.asset_id)
            .await
            .map_err(status_from_app_error)?;
        let session_id: i64 = session
            .id
            .parse()
            .map_err(|_| Status::internal("session state is inconsistent"))?;

        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let this = Arc::clone(&self);
        tokio::spawn(async move {
            let mut offset = req.offset;
            loop {
                // Server shutdown breaks the page loop between fetches.
                let fetched = tokio::select! {
                    _ = this.shutdown.cancelled() => {
                        let _ = tx.send(Err(Status::cancelled("server shutting down"))).await;
                        return;
                    }
                    fetched = tokio::time::timeout(
                        STORE_READ_DEADLINE,
                        this.bids.fetch_bids_by_asset_and_session(
                            offset,
                            req.limit,
                            &req.asset_id,
                            session_id,
                        ),
                    ) => fetched,
                };

                let page = match fetched {
                    Ok(Ok(page)) => page,
                    Ok(Err(e)) => {
                        let _ = tx.send(Err(status_from_app_error(e))).await;
                        return;
                    }
                    Err(_) => {
                        let _ = tx
                            .send(Err(Status::deadline_exceeded("store read timed out")))
                            .await;
                        return;
                    }
                };

                if let Some(scan) = &page.scan_error {
                    warn!(asset_id = %req.asset_id, skipped = scan.skip_count, "bid rows skipped during scan");
                    this.counters
                        .rows_skipped_scan
                        .fetch_add(scan.skip_count, Ordering::Relaxed);
                }
                if page.bids.is_empty() {
                    return;
                }

                let response = StreamOpenBidsResponse {
                    bids: page.bids.iter().map(to_bid_record).collect(),
                };
                // A failed send means the caller went away; stop paging.
                if tx.send(Ok(response)).await.is_err() {
                    return;
                }
                offset += req.limit;
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}

fn required_user_fp(metadata: &MetadataMap) -> Result<String, Status> {
    match metadata.get(USER_FP_HEADER).and_then(|v| v.to_str().ok()) {
        Some(fp) if !fp.is_empty() => Ok(fp.to_string()),
        _ => Err(status_from_app_error(crate::error::AppError::Unauthenticated)),
    }
}

fn to_bid_record(bid: &Bid) -> BidRecord {
    BidRecord {
        bid_id: bid.id,
        asset_id: bid.asset_id.clone(),
        session_id: bid.session_id,
        placed_by: bid.user_fp.clone(),
        amount: bid.amount as f32,
        quantity: bid.quantity as f32,
        symbol: bid.symbol.clone(),
        status: bid.status.as_str().to_string(),
        accepted: bid.accepted,
        placed_at: Some(to_proto_timestamp(bid.placed_at)),
        last_until: Some(to_proto_timestamp(bid.last_until)),
    }
}
