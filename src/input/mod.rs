//! Input capture: raw key/touch events to move commands
//!
//! Exactly one control scheme is active per session, picked once from the
//! device class and role. Schemes never touch game state; they only produce
//! `ClientCommand`s for the connection.

pub mod keyboard;
pub mod touch;

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ws::protocol::{ClientCommand, Direction, Side};

pub use keyboard::KeyboardScheme;
pub use touch::TouchScheme;

/// Which paddle(s) local input drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Left,
    Right,
    /// Local two-player match on one device
    Both,
}

impl Role {
    pub fn controls(self, side: Side) -> bool {
        match self {
            Role::Both => true,
            Role::Left => side == Side::Left,
            Role::Right => side == Side::Right,
        }
    }

    /// `player` field for a source bound to `cluster`. Single roles always
    /// report themselves.
    pub fn player_for(self, cluster: Side) -> Side {
        match self {
            Role::Left => Side::Left,
            Role::Right => Side::Right,
            Role::Both => cluster,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Role::Left),
            "right" => Ok(Role::Right),
            "both" => Ok(Role::Both),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Left => "left",
            Role::Right => "right",
            Role::Both => "both",
        })
    }
}

/// Keyboard-and-pointer vs touch screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Pointer,
    Touch,
}

impl FromStr for DeviceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pointer" | "keyboard" | "desktop" => Ok(DeviceClass::Pointer),
            "touch" | "mobile" => Ok(DeviceClass::Touch),
            other => Err(format!("unknown device class '{}'", other)),
        }
    }
}

/// Fixed for the lifetime of one match session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlContext {
    pub match_id: String,
    pub role: Role,
    pub device: DeviceClass,
}

/// On-screen touch button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchZone {
    pub side: Side,
    pub direction: Direction,
}

impl TouchZone {
    pub const fn new(side: Side, direction: Direction) -> Self {
        Self { side, direction }
    }

    /// Every zone a local two-player layout offers
    pub fn all() -> [TouchZone; 4] {
        [
            TouchZone::new(Side::Left, Direction::Up),
            TouchZone::new(Side::Left, Direction::Down),
            TouchZone::new(Side::Right, Direction::Up),
            TouchZone::new(Side::Right, Direction::Down),
        ]
    }
}

/// Raw device events as delivered by the embedder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key: String, repeat: bool },
    KeyUp { key: String },
    TouchStart { zone: TouchZone },
    TouchEnd { zone: TouchZone },
}

/// Idle/Pressed state per physical source
#[derive(Debug)]
pub struct PressTracker<S> {
    pressed: HashSet<S>,
}

impl<S: Hash + Eq> PressTracker<S> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
        }
    }

    /// Idle -> Pressed. False if the source was already down.
    pub fn press(&mut self, source: S) -> bool {
        self.pressed.insert(source)
    }

    /// Pressed -> Idle. False if the source was not down.
    pub fn release(&mut self, source: &S) -> bool {
        self.pressed.remove(source)
    }

    pub fn is_pressed(&self, source: &S) -> bool {
        self.pressed.contains(source)
    }

    pub fn reset(&mut self) {
        self.pressed.clear();
    }
}

impl<S: Hash + Eq> Default for PressTracker<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound set of listeners translating device events into commands
pub trait ControlScheme: Send {
    fn name(&self) -> &'static str;

    /// Start listening. Returns false if nothing could be wired.
    fn bind(&mut self) -> bool;

    /// Stop listening and forget held sources
    fn unbind(&mut self);

    fn is_bound(&self) -> bool;

    /// Translate one event; `None` when it is not ours or changes nothing
    fn translate(&mut self, event: &InputEvent) -> Option<ClientCommand>;
}

/// Pick the scheme for this session. `touch_zones` lists the buttons the
/// page actually mounted.
pub fn select_scheme(ctx: &ControlContext, touch_zones: &[TouchZone]) -> Box<dyn ControlScheme> {
    match ctx.device {
        DeviceClass::Pointer => Box::new(KeyboardScheme::new(ctx.role)),
        DeviceClass::Touch => Box::new(TouchScheme::new(ctx.role, touch_zones)),
    }
}
