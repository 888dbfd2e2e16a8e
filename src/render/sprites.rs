//! Power-up palette and the sprite cache keyed by power-up type

use std::collections::HashMap;

use crate::util::color::Rgb;
use crate::ws::protocol::PowerupKind;

/// Bumper ring and bumper effects
pub const BUMPER_COLOR: Rgb = Rgb::hex(0x4169E1);
const BUMPER_RIM: Rgb = Rgb::hex(0x1E90FF);

/// Glow / badge colour of a power-up
pub fn glow_color(kind: &PowerupKind) -> Rgb {
    match kind {
        PowerupKind::Speed => Rgb::hex(0xFFD700),
        PowerupKind::Shrink => Rgb::hex(0xFF0000),
        PowerupKind::Ice => Rgb::hex(0x00FFFF),
        PowerupKind::Sticky => Rgb::hex(0x32CD32),
        PowerupKind::Invert => Rgb::hex(0xFF69B4),
        PowerupKind::Flash => Rgb::hex(0xFFFF00),
        PowerupKind::Other(_) => Rgb::WHITE,
    }
}

/// Darker gradient stop
fn rim_color(kind: &PowerupKind) -> Rgb {
    match kind {
        PowerupKind::Speed => Rgb::hex(0xFFA500),
        PowerupKind::Shrink => Rgb::hex(0x8B0000),
        PowerupKind::Ice => Rgb::hex(0x00CED1),
        PowerupKind::Sticky => Rgb::hex(0x228B22),
        PowerupKind::Invert => Rgb::hex(0xFF1493),
        PowerupKind::Flash => Rgb::hex(0xFFD700),
        PowerupKind::Other(_) => Rgb::hex(0xC0C0C0),
    }
}

fn icon_path(kind: &PowerupKind) -> &'static str {
    match kind {
        PowerupKind::Speed => "M30 10 L20 25 L27 25 L17 40 L32 25 L25 25 L35 10",
        PowerupKind::Sticky => "M25 10 C15 10 15 20 25 20 C35 20 35 10 25 10 M17 20 C17 40 33 40 33 20",
        PowerupKind::Shrink => "M25 25 L35 15 M25 25 L15 15 M25 25 L35 35 M25 25 L15 35",
        PowerupKind::Ice => "M25 10 L25 40 M18 14 L32 36 M32 14 L18 36 M20 25 L30 25",
        PowerupKind::Invert => "M25 15 A10 10 0 1 1 25 35 M25 35 L20 30 M25 35 L30 30",
        PowerupKind::Flash => "M25 10 L25 17 M25 33 L25 40 M35 25 L42 25 M8 25 L15 25",
        PowerupKind::Other(_) => "M20 20 L30 30 M30 20 L20 30",
    }
}

/// Badge label, e.g. `SPEED`
pub fn badge_label(kind: &PowerupKind) -> String {
    kind.name().to_ascii_uppercase()
}

/// Pre-rendered image handed to the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub key: String,
    pub glow: Rgb,
    /// Self-contained SVG document
    pub svg: String,
}

fn powerup_sprite(kind: &PowerupKind) -> Sprite {
    let main = glow_color(kind);
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 50 50" width="30" height="30">"#,
            r#"<radialGradient id="g"><stop offset="0%" stop-color="{main}"/>"#,
            r#"<stop offset="100%" stop-color="{rim}" stop-opacity="0.6"/></radialGradient>"#,
            r#"<circle cx="25" cy="25" r="20" fill="url(#g)"/>"#,
            r#"<path d="{icon}" stroke="white" stroke-width="3" fill="none"/></svg>"#
        ),
        main = main,
        rim = rim_color(kind),
        icon = icon_path(kind),
    );
    Sprite {
        key: format!("powerup:{}", kind.name()),
        glow: main,
        svg,
    }
}

fn bumper_sprite() -> Sprite {
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"#,
            r#"<circle cx="50" cy="50" r="45" fill="none" stroke="{ring}" stroke-width="8"/>"#,
            r#"<circle cx="50" cy="50" r="35" fill="{core}"/>"#,
            r#"<circle cx="35" cy="35" r="15" fill="white" opacity="0.3"/></svg>"#
        ),
        ring = BUMPER_RIM,
        core = Rgb::hex(0xE0E0E0),
    );
    Sprite {
        key: "bumper".to_string(),
        glow: BUMPER_COLOR,
        svg,
    }
}

/// Built once per session, looked up every frame
#[derive(Debug)]
pub struct SpriteCache {
    powerups: HashMap<PowerupKind, Sprite>,
    bumper: Sprite,
}

impl SpriteCache {
    pub fn new() -> Self {
        let powerups = [
            PowerupKind::Invert,
            PowerupKind::Shrink,
            PowerupKind::Ice,
            PowerupKind::Speed,
            PowerupKind::Flash,
            PowerupKind::Sticky,
        ]
        .into_iter()
        .map(|kind| (kind.clone(), powerup_sprite(&kind)))
        .collect();

        Self {
            powerups,
            bumper: bumper_sprite(),
        }
    }

    /// Sprite for `kind`; unknown kinds reuse the speed orb
    pub fn powerup(&self, kind: &PowerupKind) -> &Sprite {
        self.powerups
            .get(kind)
            .or_else(|| self.powerups.get(&PowerupKind::Speed))
            .unwrap_or(&self.bumper)
    }

    pub fn bumper(&self) -> &Sprite {
        &self.bumper
    }
}

impl Default for SpriteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_every_known_kind() {
        let cache = SpriteCache::new();
        let ice = cache.powerup(&PowerupKind::Ice);
        assert_eq!(ice.key, "powerup:ice");
        assert_eq!(ice.glow, Rgb::hex(0x00FFFF));
        assert!(ice.svg.contains("#00FFFF"));
        assert!(ice.svg.starts_with("<svg"));
    }

    #[test]
    fn unknown_kind_falls_back_to_speed() {
        let cache = SpriteCache::new();
        let sprite = cache.powerup(&PowerupKind::Other("gravity".into()));
        assert_eq!(sprite.key, "powerup:speed");
    }

    #[test]
    fn labels_are_upper_case() {
        assert_eq!(badge_label(&PowerupKind::Sticky), "STICKY");
        assert_eq!(badge_label(&PowerupKind::Other("warp".into())), "WARP");
    }
}
