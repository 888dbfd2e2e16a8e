//! Socket task: owns the WebSocket stream and bridges it to channels

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Events surfaced by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed
    Opened,
    /// One inbound text frame
    Text(String),
    /// Socket is gone (never opened, closed by peer, or errored)
    Closed,
}

/// Channel ends the connection manager talks to
pub struct Transport {
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
    pub outbound: mpsc::UnboundedSender<String>,
}

/// Far side of an in-process transport
pub struct TransportPeer {
    pub events: mpsc::UnboundedSender<TransportEvent>,
    pub outbound: mpsc::UnboundedReceiver<String>,
}

impl TransportPeer {
    pub fn open(&self) {
        let _ = self.events.send(TransportEvent::Opened);
    }

    pub fn push(&self, text: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Text(text.into()));
    }

    pub fn close(&self) {
        let _ = self.events.send(TransportEvent::Closed);
    }

    /// Drain every frame the client has written so far
    pub fn sent(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(text) = self.outbound.try_recv() {
            frames.push(text);
        }
        frames
    }
}

impl Transport {
    /// Channel pair with no socket behind it
    pub fn loopback() -> (Transport, TransportPeer) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        (
            Transport {
                events: events_rx,
                outbound: outbound_tx,
            },
            TransportPeer {
                events: events_tx,
                outbound: outbound_rx,
            },
        )
    }

    /// Start the socket task for `url`
    pub fn connect(url: &str) -> (Transport, JoinHandle<()>) {
        let (transport, peer) = Transport::loopback();
        let url = url.to_string();
        let handle = tokio::spawn(run_socket(url, peer.events, peer.outbound));
        (transport, handle)
    }
}

/// Run the WebSocket with read/write multiplexed in one task
async fn run_socket(
    url: String,
    events: mpsc::UnboundedSender<TransportEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!(url = %url, error = %e, "WebSocket connect failed");
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };

    info!(url = %url, "WebSocket connection opened");
    if events.send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut ws_sink, mut ws_stream) = stream.split();

    loop {
        tokio::select! {
            cmd = outbound.recv() => match cmd {
                Some(text) => {
                    if let Err(e) = ws_sink.send(Message::Text(text)).await {
                        debug!(error = %e, "WebSocket send failed");
                        break;
                    }
                }
                None => {
                    // Connection manager dropped its sender: close politely
                    let _ = ws_sink.send(Message::Close(None)).await;
                    debug!("Outbound channel closed, closing socket");
                    break;
                }
            },

            frame = ws_stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Text(text)).is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    warn!("Received binary message, ignoring");
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => {}
                Some(Ok(Message::Close(_))) | None => {
                    info!(url = %url, "Server closed the connection");
                    break;
                }
                Some(Err(e)) => {
                    error!(url = %url, error = %e, "WebSocket error");
                    break;
                }
            },
        }
    }

    let _ = events.send(TransportEvent::Closed);
}
