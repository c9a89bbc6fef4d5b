use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async_with_config;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::socket::client::{self, MAX_MESSAGE_SIZE};
use crate::socket::hub::{CLIENT_SEND_BUFFER, ClientRegistration, HubHandle};

/// Accepts websocket upgrades and hands each connection a pair of pump loops
/// bridging the socket and the hub.
pub async fn serve(
    addr: &str,
    hub: HubHandle,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr, "websocket listener started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("websocket listener shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                let hub = hub.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, hub, shutdown).await {
                        warn!(%peer, error = %e, "websocket connection failed");
                    }
                });
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    hub: HubHandle,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let config = WebSocketConfig::default().max_message_size(Some(MAX_MESSAGE_SIZE));
    let ws = accept_async_with_config(stream, Some(config)).await?;
    let (mut write, mut read) = ws.split();

    let id = Uuid::new_v4();
    let (sender, mut outbound) = mpsc::channel::<String>(CLIENT_SEND_BUFFER);
    hub.register(ClientRegistration { id, sender }).await;
    info!(client = %id, "websocket client connected");

    // Either pump ending tears the connection down; the hub must then forget
    // the client so later broadcasts never observe it.
    tokio::select! {
        _ = client::read_loop(&mut read, id) => {}
        _ = client::write_loop(&mut write, &mut outbound, id) => {}
        _ = shutdown.cancelled() => {}
    }

    hub.unregister(id).await;
    let _ = write.close().await;
    info!(client = %id, "websocket client disconnected");
    Ok(())
}
