use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use rfz_auction::{
    bid::queue_redis::RedisBidQueue,
    bid::repository_pg::PgBidRepository,
    bid::worker::BidWorker,
    bid::{history_pg::PgBidHistoryRepository, queue::BidQueue},
    config::AppConfig,
    db::{Db, TimeseriesDb},
    id::IdGenerator,
    logger::init_tracing,
    metrics::counters::Counters,
    server::{self, BidRpc, SessionRpc},
    session::repository_pg::PgSessionRepository,
    session::service::SessionService,
    socket::{connect, hub::Hub},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production);

    tracing::info!("Starting rfz-auction...");

    let cfg = AppConfig::from_env();
    let counters = Counters::default();
    let ids = Arc::new(IdGenerator::new());

    // Stores are reached before any surface comes up; a failure here is a
    // non-zero exit.
    let db = Db::connect(&cfg.database_url, cfg.pg_max_connections).await?;
    db.migrate().await?;
    let ts_db = TimeseriesDb::connect(
        &cfg.timeseries_database_url,
        cfg.timeseries_max_connections,
    )
    .await?;
    ts_db.migrate().await?;
    let queue: Arc<dyn BidQueue> = Arc::new(RedisBidQueue::connect(&cfg.redis_url).await?);

    let session_repo = Arc::new(PgSessionRepository::new(db.pool.clone()));
    let bid_repo = Arc::new(PgBidRepository::new(db.pool.clone()));
    let history_repo = Arc::new(PgBidHistoryRepository::new(ts_db.pool.clone()));

    let sessions = Arc::new(SessionService::new(session_repo, Arc::clone(&ids)));

    let shutdown = CancellationToken::new();
    let tracker = TaskTracker::new();

    let (hub, hub_handle) = Hub::new(counters.clone());
    tracker.spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = hub.run(shutdown).await {
                tracing::info!(reason = %e, "push hub exited");
            }
        }
    });

    tracker.spawn({
        let hub_handle = hub_handle.clone();
        let shutdown = shutdown.clone();
        let ws_addr = cfg.ws_addr.clone();
        async move {
            if let Err(e) = connect::serve(&ws_addr, hub_handle, shutdown).await {
                tracing::error!(error = %e, "websocket listener failed");
            }
        }
    });

    let worker = BidWorker::new(
        Arc::clone(&queue),
        bid_repo.clone(),
        history_repo,
        cfg.worker_pop_timeout,
        cfg.worker_idle_sleep,
        cfg.worker_batch_size,
        cfg.worker_key_pattern.clone(),
        counters.clone(),
    );
    tracker.spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = worker.run(shutdown).await {
                tracing::error!(error = %e, "bid drain worker failed");
            }
        }
    });

    let bid_rpc = BidRpc::new(
        Arc::clone(&sessions),
        bid_repo,
        queue,
        hub_handle,
        ids,
        counters,
        shutdown.clone(),
    );
    let session_rpc = SessionRpc::new(sessions);
    tracker.spawn({
        let shutdown = shutdown.clone();
        let grpc_addr = cfg.grpc_addr.clone();
        async move {
            if let Err(e) = server::serve_grpc(&grpc_addr, bid_rpc, session_rpc, shutdown).await {
                tracing::error!(error = %e, "grpc server failed");
            }
        }
    });
    tracker.close();

    tracing::info!("rfz-auction started; waiting for shutdown signal");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    shutdown.cancel();
    if tokio::time::timeout(cfg.shutdown_grace, tracker.wait())
        .await
        .is_err()
    {
        tracing::warn!("grace period expired with tasks still running");
    }

    Ok(())
}
