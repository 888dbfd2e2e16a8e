//! Authoritative match state mirrored from `game_state` snapshots

use crate::ws::protocol::{BumperInfo, PowerupInfo, PowerupKind, Side, SnapshotPayload};

use super::{FIELD_HEIGHT, FIELD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub kind: PowerupKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bumper {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Complete snapshot. Always replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub score: Score,
    pub powerups: Vec<Pickup>,
    pub bumpers: Vec<Bumper>,
    /// Flash requested by the server itself
    pub server_flash: bool,
}

impl MatchState {
    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl Default for MatchState {
    /// Opening layout shown before the first snapshot arrives
    fn default() -> Self {
        let paddle = Paddle {
            y: 170.0,
            width: 10.0,
            height: 60.0,
        };
        Self {
            ball: Ball {
                x: FIELD_WIDTH / 2.0,
                y: FIELD_HEIGHT / 2.0,
                radius: 7.0,
                vx: 4.0,
                vy: 4.0,
            },
            left: paddle,
            right: paddle,
            score: Score::default(),
            powerups: Vec::new(),
            bumpers: Vec::new(),
            server_flash: false,
        }
    }
}

impl From<PowerupInfo> for Pickup {
    fn from(info: PowerupInfo) -> Self {
        Self {
            kind: info.kind,
            x: info.x,
            y: info.y,
        }
    }
}

impl From<BumperInfo> for Bumper {
    fn from(info: BumperInfo) -> Self {
        Self {
            x: info.x,
            y: info.y,
            radius: info.size,
        }
    }
}

impl From<SnapshotPayload> for MatchState {
    fn from(snap: SnapshotPayload) -> Self {
        Self {
            ball: Ball {
                x: snap.ball_x,
                y: snap.ball_y,
                radius: snap.ball_size,
                vx: snap.ball_speed_x,
                vy: snap.ball_speed_y,
            },
            left: Paddle {
                y: snap.paddle_left_y,
                width: snap.paddle_width,
                height: snap.paddle_left_height,
            },
            right: Paddle {
                y: snap.paddle_right_y,
                width: snap.paddle_width,
                height: snap.paddle_right_height,
            },
            score: Score {
                left: snap.score_left,
                right: snap.score_right,
            },
            powerups: snap.powerups.into_iter().map(Pickup::from).collect(),
            bumpers: snap.bumpers.into_iter().map(Bumper::from).collect(),
            server_flash: snap.flash_effect,
        }
    }
}
