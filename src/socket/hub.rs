use std::collections::HashMap;
use std::sync::atomic::Ordering;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::Bid;
use crate::error::AppError;
use crate::metrics::counters::Counters;

/// Outbound buffer per client. A client that lets this many payloads pile up
/// is considered slow and gets evicted on the next broadcast.
pub const CLIENT_SEND_BUFFER: usize = 256;

/// Live update pushed to subscribers when a bid is acknowledged. Carries the
/// asset id so subscribers can filter client-side.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidEvent {
    pub asset_id: String,
    pub bid: Bid,
}

/// A connection announcing itself to the hub: its id and the sending half of
/// its outbound channel.
pub struct ClientRegistration {
    pub id: Uuid,
    pub sender: mpsc::Sender<String>,
}

/// Cheap handle used by connections and the bid intake to talk to the hub.
#[derive(Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<ClientRegistration>,
    unregister_tx: mpsc::Sender<Uuid>,
    broadcast_tx: mpsc::Sender<String>,
}

impl HubHandle {
    pub async fn register(&self, registration: ClientRegistration) {
        if self.register_tx.send(registration).await.is_err() {
            warn!("hub is gone; dropping client registration");
        }
    }

    pub async fn unregister(&self, id: Uuid) {
        // A send failure just means the hub already shut down and dropped
        // every client.
        let _ = self.unregister_tx.send(id).await;
    }

    /// Non-blocking publish. Dropping the event when the hub lags is
    /// acceptable; the durable pipeline is the source of truth.
    pub fn broadcast(&self, payload: String) {
        if let Err(e) = self.broadcast_tx.try_send(payload) {
            warn!(error = %e, "dropping push event");
        }
    }
}

/// Maintains the set of live push subscribers and fans bid events out to
/// them. One serialising loop services registration, unregistration and
/// broadcast, so membership changes and broadcasts are observed in arrival
/// order without locks.
pub struct Hub {
    register_rx: mpsc::Receiver<ClientRegistration>,
    unregister_rx: mpsc::Receiver<Uuid>,
    broadcast_rx: mpsc::Receiver<String>,
    clients: HashMap<Uuid, mpsc::Sender<String>>,
    counters: Counters,
}

impl Hub {
    pub fn new(counters: Counters) -> (Self, HubHandle) {
        let (register_tx, register_rx) = mpsc::channel(64);
        let (unregister_tx, unregister_rx) = mpsc::channel(64);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(1024);

        (
            Self {
                register_rx,
                unregister_rx,
                broadcast_rx,
                clients: HashMap::new(),
                counters,
            },
            HubHandle {
                register_tx,
                unregister_tx,
                broadcast_tx,
            },
        )
    }

    pub async fn run(mut self, shutdown: CancellationToken) -> anyhow::Result<()> {
        info!("push hub started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(clients = self.clients.len(), "push hub shutting down");
                    // Dropping the senders closes every client's outbound
                    // channel; write loops observe the closure and hang up.
                    self.clients.clear();
                    return Err(AppError::Cancelled.into());
                }
                Some(registration) = self.register_rx.recv() => {
                    debug!(client = %registration.id, "client registered");
                    self.clients.insert(registration.id, registration.sender);
                }
                Some(id) = self.unregister_rx.recv() => {
                    if self.clients.remove(&id).is_some() {
                        debug!(client = %id, "client unregistered");
                    }
                }
                Some(payload) = self.broadcast_rx.recv() => {
                    self.counters.broadcasts.fetch_add(1, Ordering::Relaxed);
                    let counters = &self.counters;
                    self.clients.retain(|id, sender| {
                        match sender.try_send(payload.clone()) {
                            Ok(()) => true,
                            Err(TrySendError::Full(_)) => {
                                warn!(client = %id, "evicting slow consumer");
                                counters.clients_evicted.fetch_add(1, Ordering::Relaxed);
                                false
                            }
                            Err(TrySendError::Closed(_)) => false,
                        }
                    });
                }
            }
        }
    }
}
