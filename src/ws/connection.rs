//! Connection manager: socket lifecycle, decoding, command encoding and the
//! single completion signal

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::protocol::{decode, ClientCommand, ProtocolError, ServerMsg};
use super::socket::{Transport, TransportEvent};

/// Why a connection ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CloseReason {
    /// Server sent `game_over`
    GameOver { winner: Option<String> },
    /// Socket failed to open or went away
    TransportClosed,
}

/// Connection lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed(CloseReason),
}

/// What the session sees on each poll
#[derive(Debug)]
pub enum ConnectionEvent {
    Opened,
    Message(ServerMsg),
    /// Payload was dropped (already logged)
    Ignored,
    Closed(CloseReason),
}

type CloseCallback = Box<dyn FnOnce(&CloseReason) + Send>;

/// How long the socket task gets to flush its close frame
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// One socket bound to one match id
pub struct Connection {
    match_id: String,
    state: ConnectionState,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    outbound: Option<mpsc::UnboundedSender<String>>,
    on_close: Option<CloseCallback>,
    socket_task: Option<JoinHandle<()>>,
}

impl Connection {
    /// Open a real socket for `match_id`
    pub fn open(match_id: impl Into<String>, ws_url: &str) -> Self {
        let match_id = match_id.into();
        info!(match_id = %match_id, url = %ws_url, "Opening match socket");

        let (transport, task) = Transport::connect(ws_url);
        let mut connection = Self::with_transport(match_id, transport);
        connection.socket_task = Some(task);
        connection
    }

    /// Wrap an already running transport
    pub fn with_transport(match_id: impl Into<String>, transport: Transport) -> Self {
        Self {
            match_id: match_id.into(),
            state: ConnectionState::Connecting,
            events: transport.events,
            outbound: Some(transport.outbound),
            on_close: None,
            socket_task: None,
        }
    }

    /// Register the completion callback; it fires at most once
    pub fn on_close(&mut self, callback: impl FnOnce(&CloseReason) + Send + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Send a command. Dropped unless the socket is open; nothing is queued.
    pub fn send(&self, command: &ClientCommand) -> bool {
        if !self.is_open() {
            debug!(match_id = %self.match_id, ?command, "Socket not open, dropping command");
            return false;
        }

        let text = match command.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!(match_id = %self.match_id, error = %e, "Failed to encode command");
                return false;
            }
        };

        match &self.outbound {
            Some(tx) => tx.send(text).is_ok(),
            None => false,
        }
    }

    /// Wait for the next transport event and decode it
    pub async fn next_event(&mut self) -> ConnectionEvent {
        if let ConnectionState::Closed(reason) = &self.state {
            return ConnectionEvent::Closed(reason.clone());
        }

        match self.events.recv().await {
            Some(TransportEvent::Opened) => {
                self.state = ConnectionState::Open;
                info!(match_id = %self.match_id, "Match socket open");
                ConnectionEvent::Opened
            }
            Some(TransportEvent::Text(text)) => match decode(&text) {
                Ok(msg) => ConnectionEvent::Message(msg),
                Err(ProtocolError::UnknownKind(kind)) => {
                    debug!(match_id = %self.match_id, kind = %kind, "Ignoring unknown message type");
                    ConnectionEvent::Ignored
                }
                Err(e) => {
                    warn!(match_id = %self.match_id, error = %e, "Dropping malformed payload");
                    ConnectionEvent::Ignored
                }
            },
            Some(TransportEvent::Closed) | None => {
                ConnectionEvent::Closed(self.finish(CloseReason::TransportClosed))
            }
        }
    }

    /// Move to `Closed`. First reason wins; later calls return it unchanged
    /// and never re-run the callback.
    pub fn finish(&mut self, reason: CloseReason) -> CloseReason {
        if let ConnectionState::Closed(first) = &self.state {
            debug!(match_id = %self.match_id, ignored = ?reason, "Connection already closed");
            return first.clone();
        }

        info!(match_id = %self.match_id, reason = ?reason, "Match connection closed");
        self.state = ConnectionState::Closed(reason.clone());

        // Dropping the sender makes the socket task send a close frame
        self.outbound = None;

        if let Some(callback) = self.on_close.take() {
            callback(&reason);
        }
        reason
    }

    /// Release the socket and wait for its task to end. A task still running
    /// after the grace period (e.g. stuck in the handshake) is aborted.
    pub async fn shutdown(mut self) {
        self.outbound = None;
        if let Some(task) = self.socket_task.take() {
            stop_socket_task(task).await;
        }
    }
}

async fn stop_socket_task(mut task: JoinHandle<()>) {
    if tokio::time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
        debug!("Socket task did not finish in time, aborting");
        task.abort();
        let _ = task.await;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.outbound = None;
        let runtime = tokio::runtime::Handle::try_current();
        if let (Some(task), Ok(runtime)) = (self.socket_task.take(), runtime) {
            runtime.spawn(stop_socket_task(task));
        }
    }
}
