use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use rfz_auction::metrics::counters::Counters;
use rfz_auction::socket::hub::{CLIENT_SEND_BUFFER, ClientRegistration, Hub, HubHandle};

struct RunningHub {
    handle: HubHandle,
    shutdown: CancellationToken,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
    counters: Counters,
}

fn start_hub() -> RunningHub {
    let counters = Counters::default();
    let (hub, handle) = Hub::new(counters.clone());
    let shutdown = CancellationToken::new();
    let task = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { hub.run(shutdown).await }
    });
    RunningHub {
        handle,
        shutdown,
        task,
        counters,
    }
}

async fn register_client(hub: &HubHandle) -> (Uuid, mpsc::Receiver<String>) {
    let id = Uuid::new_v4();
    let (sender, receiver) = mpsc::channel(CLIENT_SEND_BUFFER);
    hub.register(ClientRegistration { id, sender }).await;
    (id, receiver)
}

async fn wait_until<F: Fn() -> bool>(deadline: Duration, check: F) -> bool {
    let end = tokio::time::Instant::now() + deadline;
    while tokio::time::Instant::now() < end {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

#[tokio::test]
async fn broadcast_reaches_every_registered_client() {
    let hub = start_hub();
    let (_, mut rx_a) = register_client(&hub.handle).await;
    let (_, mut rx_b) = register_client(&hub.handle).await;

    hub.handle.broadcast("event-1".to_string());

    let got_a = tokio::time::timeout(Duration::from_secs(1), rx_a.recv())
        .await
        .unwrap()
        .unwrap();
    let got_b = tokio::time::timeout(Duration::from_secs(1), rx_b.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got_a, "event-1");
    assert_eq!(got_b, "event-1");

    hub.shutdown.cancel();
    assert!(hub.task.await.unwrap().is_err());
}

#[tokio::test]
async fn slow_consumer_is_evicted_and_fast_consumer_sees_everything() {
    let hub = start_hub();

    // The fast client drains continuously; the slow one never reads.
    let (_, mut fast_rx) = register_client(&hub.handle).await;
    let (_, mut slow_rx) = register_client(&hub.handle).await;

    let fast_count = Arc::new(AtomicUsize::new(0));
    let fast_collector = tokio::spawn({
        let fast_count = Arc::clone(&fast_count);
        async move {
            while fast_rx.recv().await.is_some() {
                fast_count.fetch_add(1, Ordering::SeqCst);
            }
        }
    });

    let total = CLIENT_SEND_BUFFER + 1; // 257: one past the outbound buffer
    for i in 0..total {
        hub.handle.broadcast(format!("event-{i}"));
        // The hub's own inbox is bounded too; pace the producer.
        tokio::task::yield_now().await;
    }

    assert!(
        wait_until(Duration::from_secs(5), || {
            fast_count.load(Ordering::SeqCst) == total
        })
        .await,
        "fast client received {} of {total}",
        fast_count.load(Ordering::SeqCst)
    );

    // The slow client's channel was closed by eviction: after the buffered
    // 256 payloads, recv returns None rather than the 257th event.
    let mut buffered = 0;
    loop {
        match tokio::time::timeout(Duration::from_secs(1), slow_rx.recv()).await {
            Ok(Some(_)) => buffered += 1,
            Ok(None) => break,
            Err(_) => panic!("slow client channel was never closed"),
        }
    }
    assert_eq!(buffered, CLIENT_SEND_BUFFER);
    assert_eq!(hub.counters.clients_evicted.load(Ordering::Relaxed), 1);

    // Eviction is permanent: further broadcasts still reach the fast client
    // and never observe the evicted one.
    hub.handle.broadcast("after-eviction".to_string());
    assert!(
        wait_until(Duration::from_secs(1), || {
            fast_count.load(Ordering::SeqCst) == total + 1
        })
        .await
    );
    assert_eq!(hub.counters.clients_evicted.load(Ordering::Relaxed), 1);

    hub.shutdown.cancel();
    assert!(hub.task.await.unwrap().is_err());
    fast_collector.await.unwrap();
}

#[tokio::test]
async fn unregister_stops_delivery() {
    let hub = start_hub();
    let (id, mut rx) = register_client(&hub.handle).await;

    hub.handle.broadcast("before".to_string());
    assert_eq!(
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .as_deref(),
        Some("before")
    );

    hub.handle.unregister(id).await;
    // The hub drops the sender on unregister; the channel closes once the
    // unregister message is processed.
    assert!(
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .is_none()
    );

    hub.shutdown.cancel();
    assert!(hub.task.await.unwrap().is_err());
}

#[tokio::test]
async fn shutdown_closes_every_outbound_channel() {
    let hub = start_hub();
    let (_, mut rx_a) = register_client(&hub.handle).await;
    let (_, mut rx_b) = register_client(&hub.handle).await;

    hub.shutdown.cancel();
    let result = hub.task.await.unwrap();
    assert!(result.is_err(), "hub must return the cancellation error");

    assert!(rx_a.recv().await.is_none());
    assert!(rx_b.recv().await.is_none());
}
