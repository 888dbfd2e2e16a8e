//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paddle side, also used as the `player` field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paddle movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Outbound action verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    StartMove,
    StopMove,
}

/// Command sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCommand {
    pub action: MoveAction,
    pub player: Side,
    /// Only present on `start_move`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl ClientCommand {
    pub fn start(player: Side, direction: Direction) -> Self {
        Self {
            action: MoveAction::StartMove,
            player,
            direction: Some(direction),
        }
    }

    pub fn stop(player: Side) -> Self {
        Self {
            action: MoveAction::StopMove,
            player,
            direction: None,
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Malformed)
    }
}

/// Power-up effect types known to the server.
///
/// Unknown names are kept verbatim so a newer server does not break the
/// client; they behave like any other debuff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PowerupKind {
    Speed,
    Sticky,
    Shrink,
    Ice,
    Invert,
    Flash,
    Other(String),
}

impl PowerupKind {
    pub fn name(&self) -> &str {
        match self {
            PowerupKind::Speed => "speed",
            PowerupKind::Sticky => "sticky",
            PowerupKind::Shrink => "shrink",
            PowerupKind::Ice => "ice",
            PowerupKind::Invert => "invert",
            PowerupKind::Flash => "flash",
            PowerupKind::Other(name) => name,
        }
    }
}

impl From<String> for PowerupKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "speed" => PowerupKind::Speed,
            "sticky" => PowerupKind::Sticky,
            "shrink" => PowerupKind::Shrink,
            "ice" => PowerupKind::Ice,
            "invert" => PowerupKind::Invert,
            "flash" => PowerupKind::Flash,
            _ => PowerupKind::Other(name),
        }
    }
}

impl From<PowerupKind> for String {
    fn from(kind: PowerupKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Full authoritative snapshot
    GameState(SnapshotPayload),

    /// Pre-match countdown value
    Countdown { countdown_nb: i32 },

    /// Point announcement text
    Scored {
        #[serde(rename = "scoreMsg")]
        score_msg: String,
    },

    PowerupSpawned { powerup: PowerupInfo },
    PowerupExpired { powerup: PowerupInfo },
    BumperSpawned { bumper: BumperInfo },
    BumperExpired { bumper: BumperInfo },

    CollisionEvent { collision: Collision },

    /// A player picked up a power-up; `duration` is in seconds when present
    PowerupApplied {
        player: Side,
        effect: PowerupKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },

    /// Terminal message
    GameOver {
        #[serde(default)]
        winner: Option<String>,
    },
}

impl ServerMsg {
    /// Wire tags this client understands
    pub const KINDS: [&'static str; 11] = [
        "game_state",
        "countdown",
        "scored",
        "powerup_spawned",
        "powerup_expired",
        "bumper_spawned",
        "bumper_expired",
        "collision_event",
        "powerup_applied",
        "game_over",
        // Older servers wrap snapshots in the group event name
        "broadcast_game_state",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::GameState(_) => "game_state",
            ServerMsg::Countdown { .. } => "countdown",
            ServerMsg::Scored { .. } => "scored",
            ServerMsg::PowerupSpawned { .. } => "powerup_spawned",
            ServerMsg::PowerupExpired { .. } => "powerup_expired",
            ServerMsg::BumperSpawned { .. } => "bumper_spawned",
            ServerMsg::BumperExpired { .. } => "bumper_expired",
            ServerMsg::CollisionEvent { .. } => "collision_event",
            ServerMsg::PowerupApplied { .. } => "powerup_applied",
            ServerMsg::GameOver { .. } => "game_over",
        }
    }
}

/// Flat `game_state` payload as broadcast by the game loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub ball_x: f32,
    pub ball_y: f32,
    #[serde(default = "defaults::ball_size")]
    pub ball_size: f32,
    #[serde(default)]
    pub ball_speed_x: f32,
    #[serde(default)]
    pub ball_speed_y: f32,

    pub paddle_left_y: f32,
    pub paddle_right_y: f32,
    #[serde(default = "defaults::paddle_width")]
    pub paddle_width: f32,
    #[serde(default = "defaults::paddle_height")]
    pub paddle_left_height: f32,
    #[serde(default = "defaults::paddle_height")]
    pub paddle_right_height: f32,

    pub score_left: u32,
    pub score_right: u32,

    #[serde(default)]
    pub powerups: Vec<PowerupInfo>,
    #[serde(default)]
    pub bumpers: Vec<BumperInfo>,
    #[serde(default)]
    pub flash_effect: bool,
}

/// Power-up orb position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerupInfo {
    #[serde(rename = "type")]
    pub kind: PowerupKind,
    pub x: f32,
    pub y: f32,
    /// RGB triple, only sent on spawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

/// Bumper position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BumperInfo {
    pub x: f32,
    pub y: f32,
    #[serde(default = "defaults::bumper_size")]
    pub size: f32,
}

/// Field border hit by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderSide {
    Up,
    Down,
}

/// Collision notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Collision {
    PaddleCollision {
        paddle_side: Side,
    },
    BorderCollision {
        border_side: BorderSide,
        coor_x_collision: f32,
    },
    BumperCollision {
        bumper_x: f32,
        bumper_y: f32,
    },
}

mod defaults {
    pub fn ball_size() -> f32 {
        7.0
    }

    pub fn paddle_width() -> f32 {
        10.0
    }

    pub fn paddle_height() -> f32 {
        60.0
    }

    pub fn bumper_size() -> f32 {
        20.0
    }
}

/// Decoding errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload has no type tag")]
    Untagged,

    #[error("unknown message type: {0}")]
    UnknownKind(String),
}

/// Decode one inbound text frame
pub fn decode(text: &str) -> Result<ServerMsg, ProtocolError> {
    let mut value: Value = serde_json::from_str(text)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::Untagged)?
        .to_string();

    if !ServerMsg::KINDS.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownKind(kind));
    }

    if kind == "broadcast_game_state" {
        // { "type": "broadcast_game_state", "data": { "type": "game_state", ... } }
        value = match value.get_mut("data").map(Value::take) {
            Some(inner) => inner,
            None => return Err(ProtocolError::Untagged),
        };
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "type": "game_state",
        "ball_x": 412.5, "ball_y": 198.0, "ball_size": 7,
        "ball_speed_x": 4, "ball_speed_y": -4,
        "paddle_left_y": 170, "paddle_right_y": 120,
        "paddle_width": 10, "paddle_left_height": 60, "paddle_right_height": 40,
        "score_left": 2, "score_right": 1,
        "powerups": [{"type": "ice", "x": 300, "y": 220}],
        "bumpers": [{"x": 500, "y": 150, "size": 20}],
        "flash_effect": false
    }"#;

    #[test]
    fn decodes_full_snapshot() {
        let msg = decode(SNAPSHOT).unwrap();
        let ServerMsg::GameState(snap) = msg else {
            panic!("expected game_state");
        };
        assert_eq!(snap.ball_x, 412.5);
        assert_eq!(snap.paddle_right_height, 40.0);
        assert_eq!(snap.score_left, 2);
        assert_eq!(snap.powerups[0].kind, PowerupKind::Ice);
        assert_eq!(snap.bumpers[0].size, 20.0);
    }

    #[test]
    fn snapshot_without_positions_is_malformed() {
        let err = decode(r#"{"type":"game_state","ball_x":1,"score_left":0}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn unwraps_group_broadcast_envelope() {
        let wrapped = format!(r#"{{"type":"broadcast_game_state","data":{}}}"#, SNAPSHOT);
        assert!(matches!(decode(&wrapped).unwrap(), ServerMsg::GameState(_)));
    }

    #[test]
    fn rejects_unknown_and_untagged() {
        assert!(matches!(
            decode(r#"{"type":"chat","text":"hi"}"#),
            Err(ProtocolError::UnknownKind(k)) if k == "chat"
        ));
        assert!(matches!(decode(r#"{"winner":"left"}"#), Err(ProtocolError::Untagged)));
        assert!(matches!(decode("not json"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn decodes_event_messages() {
        let msg = decode(r#"{"type":"powerup_applied","player":"left","effect":"shrink","duration":5}"#)
            .unwrap();
        match msg {
            ServerMsg::PowerupApplied { player, effect, duration } => {
                assert_eq!(player, Side::Left);
                assert_eq!(effect, PowerupKind::Shrink);
                assert_eq!(duration, Some(5.0));
            }
            other => panic!("unexpected {:?}", other),
        }

        let msg = decode(r#"{"type":"powerup_applied","player":"right","effect":"ice"}"#).unwrap();
        assert!(matches!(msg, ServerMsg::PowerupApplied { duration: None, .. }));

        let msg = decode(
            r#"{"type":"collision_event","collision":{"type":"border_collision","border_side":"up","coor_x_collision":321.0}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ServerMsg::CollisionEvent {
                collision: Collision::BorderCollision { border_side: BorderSide::Up, .. }
            }
        ));

        let msg = decode(r#"{"type":"scored","scoreMsg":"Left scores!"}"#).unwrap();
        assert!(matches!(msg, ServerMsg::Scored { score_msg } if score_msg == "Left scores!"));

        let msg = decode(r#"{"type":"powerup_spawned","powerup":{"type":"gravity","x":1,"y":2,"color":[1,2,3]}}"#)
            .unwrap();
        match msg {
            ServerMsg::PowerupSpawned { powerup } => {
                assert_eq!(powerup.kind, PowerupKind::Other("gravity".into()));
                assert_eq!(powerup.color, Some([1, 2, 3]));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn encodes_commands_without_empty_direction() {
        let start = ClientCommand::start(Side::Right, Direction::Up).encode().unwrap();
        assert_eq!(start, r#"{"action":"start_move","player":"right","direction":"up"}"#);

        let stop = ClientCommand::stop(Side::Left).encode().unwrap();
        assert_eq!(stop, r#"{"action":"stop_move","player":"left"}"#);
    }
}
