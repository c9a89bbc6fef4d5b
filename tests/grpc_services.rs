mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::Code;
use tonic::transport::Server;
use uuid::Uuid;

use common::{MemoryBidQueue, MockBidRepository, MockHistoryRepository, MockSessionRepository};
use rfz_auction::bid::queue::{BidQueue, bid_queue_key};
use rfz_auction::bid::worker::BidWorker;
use rfz_auction::domain::{AuctionType, Bid, NewSessionRequest, Session};
use rfz_auction::generated::bid::v1::bid_service_client::BidServiceClient;
use rfz_auction::generated::bid::v1::bid_service_server::BidServiceServer;
use rfz_auction::generated::bid::v1::{
    CreateBidRequest, GetUserBidRequest, StreamOpenBidsRequest,
};
use rfz_auction::generated::session::v1::session_service_client::SessionServiceClient;
use rfz_auction::generated::session::v1::session_service_server::SessionServiceServer;
use rfz_auction::generated::session::v1::{
    CreateSessionRequest, GetActiveAssetSessionRequest,
};
use rfz_auction::id::IdGenerator;
use rfz_auction::metrics::counters::Counters;
use rfz_auction::server::{BidRpc, SessionRpc};
use rfz_auction::session::service::SessionService;
use rfz_auction::socket::hub::{BidEvent, CLIENT_SEND_BUFFER, ClientRegistration, Hub, HubHandle};
use rfz_auction::time::to_proto_timestamp;

struct TestStack {
    addr: SocketAddr,
    queue: Arc<MemoryBidQueue>,
    bid_repo: Arc<MockBidRepository>,
    session_repo: Arc<MockSessionRepository>,
    hub: HubHandle,
    shutdown: CancellationToken,
}

fn active_session(asset_id: &str, session_id: i64) -> Session {
    let now = Utc::now();
    Session::from_request(
        session_id,
        NewSessionRequest {
            asset_id: asset_id.to_string(),
            name: "window".into(),
            auction_type: AuctionType::EnglishAuction,
            auto_execute: false,
            start_time: now - chrono::Duration::minutes(1),
            end_time: now + chrono::Duration::minutes(10),
            reserve_price: 0.0,
            bid_increment_amount: 1.0,
        },
        "owner-fp",
    )
    .unwrap()
}

async fn start_stack(session_repo: Arc<MockSessionRepository>) -> TestStack {
    let queue = Arc::new(MemoryBidQueue::default());
    let bid_repo = Arc::new(MockBidRepository::default());
    let ids = Arc::new(IdGenerator::new());
    let counters = Counters::default();

    let (hub, hub_handle) = Hub::new(counters.clone());
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            let _ = hub.run(shutdown).await;
        }
    });

    let sessions = Arc::new(SessionService::new(session_repo.clone(), Arc::clone(&ids)));
    let bid_rpc = BidRpc::new(
        Arc::clone(&sessions),
        bid_repo.clone(),
        queue.clone(),
        hub_handle.clone(),
        ids,
        counters,
        shutdown.clone(),
    );
    let session_rpc = SessionRpc::new(sessions);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = Server::builder()
            .add_service(BidServiceServer::from_arc(Arc::new(bid_rpc)))
            .add_service(SessionServiceServer::from_arc(Arc::new(session_rpc)))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await;
    });

    TestStack {
        addr,
        queue,
        bid_repo,
        session_repo,
        hub: hub_handle,
        shutdown,
    }
}

async fn bid_client(addr: SocketAddr) -> BidServiceClient<tonic::transport::Channel> {
    BidServiceClient::connect(format!("http://{addr}")).await.unwrap()
}

fn create_bid_request(asset_id: &str, amount: f32) -> CreateBidRequest {
    CreateBidRequest {
        asset_id: asset_id.to_string(),
        amount,
        last_until: Some(to_proto_timestamp(Utc::now() + chrono::Duration::minutes(5))),
    }
}

fn with_user<T>(message: T, user_fp: &str) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    request
        .metadata_mut()
        .insert("x-rfz-user", user_fp.parse().unwrap());
    request
}

#[tokio::test]
async fn create_bid_acknowledges_and_enqueues_before_durable_write() {
    let session = active_session("asset-a", 501);
    let session_end = session.end_time;
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(session))).await;

    // A push subscriber observes the live event.
    let (sender, mut events) = mpsc::channel(CLIENT_SEND_BUFFER);
    stack
        .hub
        .register(ClientRegistration {
            id: Uuid::new_v4(),
            sender,
        })
        .await;

    let mut client = bid_client(stack.addr).await;
    let response = client
        .create_bid(with_user(create_bid_request("asset-a", 5.0), "bidder-1"))
        .await
        .unwrap()
        .into_inner();

    assert!(response.bid_id > 0);
    assert_eq!(response.asset_id, "asset-a");
    assert_eq!(response.session_id, 501);
    assert_eq!(response.amount, 5.0);

    // Acknowledged bid sits in the queue; nothing touched the store yet.
    let key = bid_queue_key("asset-a", session_end, 501);
    assert_eq!(stack.queue.len(&key), 1);
    assert!(stack.bid_repo.saved.lock().is_empty());

    let payload = stack.queue.pop(&key).await.unwrap().unwrap();
    let queued: Bid = serde_json::from_str(&payload).unwrap();
    assert_eq!(queued.id, response.bid_id);
    assert_eq!(queued.user_fp, "bidder-1");
    assert_eq!(queued.asset_owner, "owner-fp");

    let event_json = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    let event: BidEvent = serde_json::from_str(&event_json).unwrap();
    assert_eq!(event.asset_id, "asset-a");
    assert_eq!(event.bid.id, response.bid_id);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn create_bid_without_identity_is_unauthenticated() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 502),
    )))
    .await;
    let mut client = bid_client(stack.addr).await;

    let status = client
        .create_bid(tonic::Request::new(create_bid_request("asset-a", 5.0)))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn create_bid_without_active_session_is_failed_precondition() {
    let stack = start_stack(Arc::new(MockSessionRepository::default())).await;
    let mut client = bid_client(stack.addr).await;

    let status = client
        .create_bid(with_user(create_bid_request("asset-b", 5.0), "bidder-1"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::FailedPrecondition);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn create_bid_rejects_bad_amount_and_expiry() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 503),
    )))
    .await;
    let mut client = bid_client(stack.addr).await;

    let status = client
        .create_bid(with_user(create_bid_request("asset-a", 0.0), "bidder-1"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let expired = CreateBidRequest {
        asset_id: "asset-a".into(),
        amount: 5.0,
        last_until: Some(to_proto_timestamp(Utc::now() - chrono::Duration::minutes(1))),
    };
    let status = client
        .create_bid(with_user(expired, "bidder-1"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn get_user_bid_enforces_limit_bounds() {
    let stack = start_stack(Arc::new(MockSessionRepository::default())).await;
    let mut client = bid_client(stack.addr).await;

    for (limit, expected) in [(0, Some(Code::InvalidArgument)), (101, Some(Code::InvalidArgument)), (100, None)] {
        let request = GetUserBidRequest {
            user_fp: "bidder-1".into(),
            asset_id: "asset-a".into(),
            offset: 0,
            limit,
        };
        let result = client.get_user_bid(tonic::Request::new(request)).await;
        match expected {
            Some(code) => assert_eq!(result.unwrap_err().code(), code, "limit {limit}"),
            None => assert!(result.is_ok(), "limit {limit} must pass"),
        }
    }

    let request = GetUserBidRequest {
        user_fp: "bidder-1".into(),
        asset_id: "asset-a".into(),
        offset: -1,
        limit: 10,
    };
    let status = client
        .get_user_bid(tonic::Request::new(request))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn get_user_bid_returns_page_and_totals() {
    let stack = start_stack(Arc::new(MockSessionRepository::default())).await;
    let bids: Vec<Bid> = (1..=3)
        .map(|id| {
            Bid::new(
                id,
                "bidder-1",
                5.0,
                1.0,
                "asset-a",
                "owner-fp",
                Utc::now() + chrono::Duration::minutes(5),
                501,
            )
            .unwrap()
        })
        .collect();
    stack.bid_repo.fetch_pages.lock().push_back(bids);
    *stack.bid_repo.total.lock() = 12;

    let mut client = bid_client(stack.addr).await;
    let response = client
        .get_user_bid(tonic::Request::new(GetUserBidRequest {
            user_fp: "bidder-1".into(),
            asset_id: "asset-a".into(),
            offset: 0,
            limit: 10,
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.row_count, 3);
    assert_eq!(response.total_results, 12);
    assert_eq!(response.bids.len(), 3);
    assert_eq!(response.bids[0].placed_by, "bidder-1");
    assert_eq!(response.bids[0].status, "PENDING");

    stack.shutdown.cancel();
}

#[tokio::test]
async fn stream_open_bids_pages_until_empty() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 504),
    )))
    .await;

    let mk = |id: i64| {
        Bid::new(
            id,
            "bidder-1",
            5.0,
            1.0,
            "asset-a",
            "owner-fp",
            Utc::now() + chrono::Duration::minutes(5),
            504,
        )
        .unwrap()
    };
    stack
        .bid_repo
        .fetch_pages
        .lock()
        .extend([vec![mk(1), mk(2), mk(3)], vec![mk(4), mk(5)]]);

    let mut client = bid_client(stack.addr).await;
    let mut stream = client
        .stream_open_bids(tonic::Request::new(StreamOpenBidsRequest {
            asset_id: "asset-a".into(),
            offset: 0,
            limit: 3,
        }))
        .await
        .unwrap()
        .into_inner();

    let mut streamed = Vec::new();
    while let Some(page) = stream.message().await.unwrap() {
        streamed.extend(page.bids.into_iter().map(|b| b.bid_id));
    }
    assert_eq!(streamed, vec![1, 2, 3, 4, 5]);

    // The page loop advanced offset by limit each round and stopped on the
    // empty page.
    assert_eq!(stack.bid_repo.fetch_offsets.lock().clone(), vec![0, 3, 6]);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn stream_open_bids_breaks_out_of_the_page_loop_on_shutdown() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 510),
    )))
    .await;

    // Endless pages: without cancellation this stream would never terminate.
    *stack.bid_repo.repeat_page.lock() = Some(vec![
        Bid::new(
            1,
            "bidder-1",
            5.0,
            1.0,
            "asset-a",
            "owner-fp",
            Utc::now() + chrono::Duration::minutes(5),
            510,
        )
        .unwrap(),
    ]);

    let mut client = bid_client(stack.addr).await;
    let mut stream = client
        .stream_open_bids(tonic::Request::new(StreamOpenBidsRequest {
            asset_id: "asset-a".into(),
            offset: 0,
            limit: 1,
        }))
        .await
        .unwrap()
        .into_inner();

    // The stream is live before the signal.
    assert!(stream.message().await.unwrap().is_some());

    stack.shutdown.cancel();

    // Keep draining: the handler exits between page fetches and surfaces the
    // cancellation instead of paging forever.
    let outcome = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match stream.message().await {
                Ok(Some(_)) => continue,
                Ok(None) => return None,
                Err(status) => return Some(status),
            }
        }
    })
    .await
    .expect("stream never terminated after shutdown");

    if let Some(status) = outcome {
        assert_eq!(status.code(), Code::Cancelled);
    }
}

#[tokio::test]
async fn stream_open_bids_enforces_limit_bound() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 505),
    )))
    .await;
    let mut client = bid_client(stack.addr).await;

    let status = client
        .stream_open_bids(tonic::Request::new(StreamOpenBidsRequest {
            asset_id: "asset-a".into(),
            offset: 0,
            limit: 201,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn create_session_computes_initial_status() {
    let stack = start_stack(Arc::new(MockSessionRepository::default())).await;
    let mut client = SessionServiceClient::connect(format!("http://{}", stack.addr))
        .await
        .unwrap();

    let now = Utc::now();
    let response = client
        .create_session(with_user(
            CreateSessionRequest {
                asset_id: "asset-a".into(),
                name: Some("friday window".into()),
                auction_type: "EnglishAuction".into(),
                auto_execute: false,
                start_time: Some(to_proto_timestamp(now - chrono::Duration::minutes(1))),
                end_time: Some(to_proto_timestamp(now + chrono::Duration::minutes(30))),
                reserve_price: 0.0,
                bid_increment_amount: 1.0,
            },
            "owner-fp",
        ))
        .await
        .unwrap()
        .into_inner();

    let session = response.session.unwrap();
    assert_eq!(session.status, "Active");
    assert_eq!(session.auction_type, "EnglishAuction");
    assert!(session.session_id.parse::<i64>().unwrap() > 0);
    assert_eq!(stack.session_repo.sessions.lock().len(), 1);

    let scheduled = client
        .create_session(with_user(
            CreateSessionRequest {
                asset_id: "asset-z".into(),
                name: None,
                auction_type: "DutchAuction".into(),
                auto_execute: true,
                start_time: Some(to_proto_timestamp(now + chrono::Duration::minutes(10))),
                end_time: Some(to_proto_timestamp(now + chrono::Duration::minutes(40))),
                reserve_price: 2.0,
                bid_increment_amount: 0.5,
            },
            "owner-fp",
        ))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(scheduled.session.unwrap().status, "Scheduled");

    stack.shutdown.cancel();
}

#[tokio::test]
async fn create_session_rejects_degenerate_windows_and_types() {
    let stack = start_stack(Arc::new(MockSessionRepository::default())).await;
    let mut client = SessionServiceClient::connect(format!("http://{}", stack.addr))
        .await
        .unwrap();

    let now = Utc::now();
    let same_instant = to_proto_timestamp(now + chrono::Duration::minutes(5));
    let status = client
        .create_session(tonic::Request::new(CreateSessionRequest {
            asset_id: "asset-a".into(),
            name: None,
            auction_type: "EnglishAuction".into(),
            auto_execute: false,
            start_time: Some(same_instant.clone()),
            end_time: Some(same_instant),
            reserve_price: 0.0,
            bid_increment_amount: 1.0,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = client
        .create_session(tonic::Request::new(CreateSessionRequest {
            asset_id: "asset-a".into(),
            name: None,
            auction_type: "VickreyAuction".into(),
            auto_execute: false,
            start_time: Some(to_proto_timestamp(now)),
            end_time: Some(to_proto_timestamp(now + chrono::Duration::minutes(5))),
            reserve_price: 0.0,
            bid_increment_amount: 1.0,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn get_active_asset_session_round_trips() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 506),
    )))
    .await;
    let mut client = SessionServiceClient::connect(format!("http://{}", stack.addr))
        .await
        .unwrap();

    let response = client
        .get_active_asset_session(tonic::Request::new(GetActiveAssetSessionRequest {
            asset_id: "asset-a".into(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(response.session.unwrap().session_id, "506");

    let status = client
        .get_active_asset_session(tonic::Request::new(GetActiveAssetSessionRequest {
            asset_id: "asset-without-session".into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::FailedPrecondition);

    stack.shutdown.cancel();
}

async fn wait_until<F: Fn() -> bool>(deadline: Duration, check: F) -> bool {
    let end = tokio::time::Instant::now() + deadline;
    while tokio::time::Instant::now() < end {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

#[tokio::test]
async fn acknowledged_bid_lands_in_both_stores() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 508),
    )))
    .await;

    // The full pipeline behind the ack: drain worker moving queued bids into
    // the relational and history sinks.
    let history_repo = Arc::new(MockHistoryRepository::default());
    let worker = BidWorker::new(
        stack.queue.clone(),
        stack.bid_repo.clone(),
        history_repo.clone(),
        Duration::from_millis(50),
        Duration::from_millis(10),
        64,
        "bid_*".to_string(),
        Counters::default(),
    );
    let worker_shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = worker_shutdown.clone();
        async move {
            let _ = worker.run(shutdown).await;
        }
    });

    let mut client = bid_client(stack.addr).await;
    let response = client
        .create_bid(with_user(create_bid_request("asset-a", 5.0), "bidder-1"))
        .await
        .unwrap()
        .into_inner();

    // Within two seconds both stores hold a row under the intake-assigned id.
    assert!(
        wait_until(Duration::from_secs(2), || {
            stack
                .bid_repo
                .saved
                .lock()
                .iter()
                .any(|b| b.id == response.bid_id)
                && history_repo
                    .saved
                    .lock()
                    .iter()
                    .any(|b| b.id == response.bid_id)
        })
        .await,
        "acknowledged bid never reached both stores"
    );

    worker_shutdown.cancel();
    stack.shutdown.cancel();
}

#[tokio::test]
async fn queue_push_failure_surfaces_as_internal() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 509),
    )))
    .await;
    *stack.queue.fail_pushes.lock() = true;

    let mut client = bid_client(stack.addr).await;
    let status = client
        .create_bid(with_user(create_bid_request("asset-a", 5.0), "bidder-1"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn concurrent_bids_land_on_the_same_active_session() {
    let stack = start_stack(Arc::new(MockSessionRepository::with_session(
        active_session("asset-a", 507),
    )))
    .await;

    let mut first = bid_client(stack.addr).await;
    let mut second = bid_client(stack.addr).await;
    let (a, b) = tokio::join!(
        first.create_bid(with_user(create_bid_request("asset-a", 5.0), "bidder-1")),
        second.create_bid(with_user(create_bid_request("asset-a", 6.0), "bidder-2")),
    );

    let a = a.unwrap().into_inner();
    let b = b.unwrap().into_inner();
    assert_eq!(a.session_id, 507);
    assert_eq!(b.session_id, 507);
    assert_ne!(a.bid_id, b.bid_id);

    stack.shutdown.cancel();
}
