//! Touch control scheme: on-screen up/down buttons per paddle

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{ControlScheme, InputEvent, PressTracker, Role, TouchZone};
use crate::ws::protocol::{ClientCommand, Direction, Side};

pub struct TouchScheme {
    role: Role,
    mounted: Vec<TouchZone>,
    wired: HashSet<TouchZone>,
    bound: bool,
    held: PressTracker<TouchZone>,
}

impl TouchScheme {
    pub fn new(role: Role, mounted: &[TouchZone]) -> Self {
        Self {
            role,
            mounted: mounted.to_vec(),
            wired: HashSet::new(),
            bound: false,
            held: PressTracker::new(),
        }
    }

    /// Zones this role needs
    fn wanted(&self) -> Vec<TouchZone> {
        TouchZone::all()
            .into_iter()
            .filter(|zone| self.role.controls(zone.side))
            .collect()
    }
}

impl ControlScheme for TouchScheme {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn bind(&mut self) -> bool {
        self.wired.clear();
        for zone in self.wanted() {
            if self.mounted.contains(&zone) {
                self.wired.insert(zone);
            } else {
                warn!(side = %zone.side, direction = ?zone.direction, "Touch control missing, skipping");
            }
        }
        self.bound = true;
        debug!(role = %self.role, zones = self.wired.len(), "Touch controls bound");
        !self.wired.is_empty()
    }

    fn unbind(&mut self) {
        self.bound = false;
        self.wired.clear();
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
            InputEvent::TouchStart { zone } if self.wired.contains(zone) => {
                if !self.held.press(*zone) {
                    return None;
                }
                Some(ClientCommand::start(self.role.player_for(zone.side), zone.direction))
            }
            InputEvent::TouchEnd { zone } if self.wired.contains(zone) => {
                if !self.held.release(zone) {
                    return None;
                }
                Some(ClientCommand::stop(self.role.player_for(zone.side)))
            }
            _ => None,
        }
    }
}

/// Zones for a single role's two buttons
pub fn zones_for(side: Side) -> [TouchZone; 2] {
    [
        TouchZone::new(side, Direction::Up),
        TouchZone::new(side, Direction::Down),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(side: Side, direction: Direction) -> InputEvent {
        InputEvent::TouchStart {
            zone: TouchZone::new(side, direction),
        }
    }

    fn end(side: Side, direction: Direction) -> InputEvent {
        InputEvent::TouchEnd {
            zone: TouchZone::new(side, direction),
        }
    }

    #[test]
    fn right_role_wires_only_its_zones() {
        let mut scheme = TouchScheme::new(Role::Right, &TouchZone::all());
        assert!(scheme.bind());

        assert_eq!(scheme.translate(&start(Side::Left, Direction::Up)), None);
        assert_eq!(
            scheme.translate(&start(Side::Right, Direction::Down)),
            Some(ClientCommand::start(Side::Right, Direction::Down))
        );
        assert_eq!(scheme.translate(&start(Side::Right, Direction::Down)), None);
        assert_eq!(
            scheme.translate(&end(Side::Right, Direction::Down)),
            Some(ClientCommand::stop(Side::Right))
        );
        assert_eq!(scheme.translate(&end(Side::Right, Direction::Down)), None);
    }

    #[test]
    fn missing_buttons_degrade_instead_of_failing() {
        let mut scheme = TouchScheme::new(Role::Both, &zones_for(Side::Left));
        assert!(scheme.bind());
        assert!(scheme.translate(&start(Side::Left, Direction::Up)).is_some());
        assert_eq!(scheme.translate(&start(Side::Right, Direction::Up)), None);

        let mut bare = TouchScheme::new(Role::Left, &[]);
        assert!(!bare.bind());
        assert_eq!(bare.translate(&start(Side::Left, Direction::Up)), None);
    }

    #[test]
    fn ignores_keyboard_events() {
        let mut scheme = TouchScheme::new(Role::Both, &TouchZone::all());
        scheme.bind();
        let key = InputEvent::KeyDown {
            key: "w".into(),
            repeat: false,
        };
        assert_eq!(scheme.translate(&key), None);
    }
}
