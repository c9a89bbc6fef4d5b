use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{Bytes, Message};
use tracing::{debug, warn};
use uuid::Uuid;

/// Time allowed to write one frame to the peer.
pub const WRITE_WAIT: Duration = Duration::from_secs(5);

/// Time allowed between inbound frames; pongs count, so a silent-but-alive
/// peer keeps the connection open.
pub const PONG_WAIT: Duration = Duration::from_secs(30);

/// Ping cadence. Must stay below `PONG_WAIT`.
pub const PING_PERIOD: Duration = Duration::from_millis(PONG_WAIT.as_millis() as u64 * 9 / 10);

/// Maximum inbound frame size; subscribers only ever need to send pongs.
pub const MAX_MESSAGE_SIZE: usize = 512;

/// Pumps inbound frames until the peer goes quiet past `PONG_WAIT`, hangs up
/// or errors. The transport answers pings for us; everything else is logged
/// and dropped.
pub async fn read_loop(read: &mut SplitStream<WebSocketStream<TcpStream>>, id: Uuid) {
    loop {
        match timeout(PONG_WAIT, read.next()).await {
            Err(_) => {
                warn!(client = %id, "no frame within pong deadline; dropping connection");
                return;
            }
            Ok(None) => return,
            Ok(Some(Err(e))) => {
                debug!(client = %id, error = %e, "websocket read failed");
                return;
            }
            Ok(Some(Ok(message))) => match message {
                Message::Close(_) => return,
                Message::Pong(_) => {}
                Message::Text(text) => {
                    debug!(client = %id, bytes = text.len(), "inbound text frame");
                }
                Message::Binary(payload) => {
                    debug!(client = %id, bytes = payload.len(), "inbound binary frame");
                }
                _ => {}
            },
        }
    }
}

/// Drains the client's outbound channel onto the socket, pinging every
/// `PING_PERIOD`. Exits when the hub closes the channel (sending a close
/// frame first), or when any write errors or outlasts `WRITE_WAIT`.
pub async fn write_loop(
    write: &mut SplitSink<WebSocketStream<TcpStream>, Message>,
    outbound: &mut mpsc::Receiver<String>,
    id: Uuid,
) {
    let start = tokio::time::Instant::now() + PING_PERIOD;
    let mut ping = tokio::time::interval_at(start, PING_PERIOD);

    loop {
        tokio::select! {
            maybe_payload = outbound.recv() => {
                let Some(payload) = maybe_payload else {
                    // Hub closed the channel: evicted or shutting down.
                    let _ = timeout(WRITE_WAIT, write.send(Message::Close(None))).await;
                    return;
                };
                if !send_with_deadline(write, Message::Text(payload.into()), id).await {
                    return;
                }
            }
            _ = ping.tick() => {
                if !send_with_deadline(write, Message::Ping(Bytes::new()), id).await {
                    return;
                }
            }
        }
    }
}

async fn send_with_deadline(
    write: &mut SplitSink<WebSocketStream<TcpStream>, Message>,
    message: Message,
    id: Uuid,
) -> bool {
    match timeout(WRITE_WAIT, write.send(message)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!(client = %id, error = %e, "websocket write failed");
            false
        }
        Err(_) => {
            warn!(client = %id, "write deadline expired");
            false
        }
    }
}
