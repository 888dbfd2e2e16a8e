//! Match socket: wire protocol, socket task and connection manager

pub mod connection;
pub mod protocol;
pub mod socket;

pub use connection::{CloseReason, Connection, ConnectionEvent, ConnectionState};
pub use protocol::{
    BorderSide, BumperInfo, ClientCommand, Collision, Direction, MoveAction, PowerupInfo,
    PowerupKind, ProtocolError, ServerMsg, Side, SnapshotPayload,
};
pub use socket::{Transport, TransportEvent, TransportPeer};

/// Socket URL for a match, e.g. `ws://host:8000/ws/pong/42/`
pub fn match_socket_url(server_url: &str, match_id: &str) -> String {
    format!("{}/ws/pong/{}/", server_url.trim_end_matches('/'), match_id)
}
