//! Keyboard control scheme: W/S for the left paddle, arrows for the right

use tracing::{debug, trace};

use super::{ControlScheme, InputEvent, PressTracker, Role};
use crate::ws::protocol::{ClientCommand, Direction, Side};

/// Key cluster and direction a key belongs to
fn binding(key: &str) -> Option<(Side, Direction)> {
    match key {
        "w" | "W" => Some((Side::Left, Direction::Up)),
        "s" | "S" => Some((Side::Left, Direction::Down)),
        "ArrowUp" => Some((Side::Right, Direction::Up)),
        "ArrowDown" => Some((Side::Right, Direction::Down)),
        _ => None,
    }
}

pub struct KeyboardScheme {
    role: Role,
    bound: bool,
    held: PressTracker<(Side, Direction)>,
}

impl KeyboardScheme {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            bound: false,
            held: PressTracker::new(),
        }
    }

    /// Binding for `key` if its cluster is wired for this role
    fn wired(&self, key: &str) -> Option<(Side, Direction)> {
        binding(key).filter(|(cluster, _)| self.role.controls(*cluster))
    }
}

impl ControlScheme for KeyboardScheme {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn bind(&mut self) -> bool {
        self.bound = true;
        debug!(role = %self.role, "Keyboard controls bound");
        true
    }

    fn unbind(&mut self) {
        self.bound = false;
        self.held.reset();
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    fn translate(&mut self, event: &InputEvent) -> Option<ClientCommand> {
        if !self.bound {
            return None;
        }

        match event {
            InputEvent::KeyDown { key, repeat } => {
                if *repeat {
                    return None;
                }
                let (cluster, direction) = self.wired(key)?;
                if !self.held.press((cluster, direction)) {
                    trace!(key = %key, "Key already held");
                    return None;
                }
                Some(ClientCommand::start(self.role.player_for(cluster), direction))
            }
            InputEvent::KeyUp { key } => {
                let source = self.wired(key)?;
                if !self.held.release(&source) {
                    return None;
                }
                Some(ClientCommand::stop(self.role.player_for(source.0)))
            }
            InputEvent::TouchStart { .. } | InputEvent::TouchEnd { .. } => None,
        }
    }
}
