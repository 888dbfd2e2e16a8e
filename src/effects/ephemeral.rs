//! Short-lived cosmetic effects (collision sparks, spawn/expire flourishes)

use std::time::Duration;

use tokio::time::Instant;

use crate::util::color::Rgb;
use crate::util::time::progress;

/// Effect kinds, one per server event that triggers an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    PaddleCollision,
    BorderCollision,
    BumperCollision,
    PowerupSpawn,
    PowerupExpire,
    BumperSpawn,
    BumperExpire,
}

impl EffectKind {
    pub fn duration(self) -> Duration {
        match self {
            EffectKind::PowerupSpawn | EffectKind::BumperSpawn => Duration::from_millis(500),
            EffectKind::PowerupExpire | EffectKind::BumperExpire => Duration::from_millis(400),
            EffectKind::PaddleCollision
            | EffectKind::BorderCollision
            | EffectKind::BumperCollision => Duration::from_millis(300),
        }
    }
}

/// Opaque id returned by `spawn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectHandle(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct EphemeralEffect {
    pub kind: EffectKind,
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    pub started: Instant,
}

impl EphemeralEffect {
    pub fn expires_at(&self) -> Instant {
        self.started + self.kind.duration()
    }

    /// Normalised age in [0, 1]
    pub fn progress(&self, now: Instant) -> f32 {
        progress(self.started, self.kind.duration(), now)
    }
}

/// Live effects in spawn order
#[derive(Debug, Default)]
pub struct EffectList {
    live: Vec<(EffectHandle, EphemeralEffect)>,
    next_id: u64,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        kind: EffectKind,
        (x, y): (f32, f32),
        color: Option<Rgb>,
        now: Instant,
    ) -> EffectHandle {
        let handle = EffectHandle(self.next_id);
        self.next_id += 1;
        self.live.push((
            handle,
            EphemeralEffect {
                kind,
                x,
                y,
                color: color.unwrap_or(Rgb::WHITE),
                started: now,
            },
        ));
        handle
    }

    /// Drop every effect whose own duration has elapsed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.live.len();
        self.live.retain(|(_, effect)| effect.expires_at() > now);
        before - self.live.len()
    }

    pub fn contains(&self, handle: EffectHandle) -> bool {
        self.live.iter().any(|(h, _)| *h == handle)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.live.iter().map(|(_, effect)| effect.expires_at()).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EphemeralEffect> {
        self.live.iter().map(|(_, effect)| effect)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_effect_expires_on_its_own_clock() {
        let t0 = Instant::now();
        let mut effects = EffectList::new();
        let spark = effects.spawn(EffectKind::PaddleCollision, (60.0, 200.0), None, t0);
        let spawn = effects.spawn(EffectKind::PowerupSpawn, (300.0, 220.0), Some(Rgb::hex(0x00FFFF)), t0);

        assert_eq!(effects.next_deadline(), Some(t0 + Duration::from_millis(300)));

        assert_eq!(effects.prune(t0 + Duration::from_millis(300)), 1);
        assert!(!effects.contains(spark));
        assert!(effects.contains(spawn));

        let fade = effects.spawn(EffectKind::BumperExpire, (1.0, 1.0), None, t0);
        assert_eq!(effects.prune(t0 + Duration::from_millis(400)), 1);
        assert!(!effects.contains(fade));

        assert_eq!(effects.prune(t0 + Duration::from_millis(499)), 0);
        assert_eq!(effects.prune(t0 + Duration::from_millis(500)), 1);
        assert!(effects.is_empty());
    }

    #[test]
    fn progress_tracks_kind_duration() {
        let t0 = Instant::now();
        let mut effects = EffectList::new();
        effects.spawn(EffectKind::BumperSpawn, (0.0, 0.0), None, t0);
        let effect = effects.iter().next().unwrap();

        assert_eq!(effect.color, Rgb::WHITE);
        assert!((effect.progress(t0 + Duration::from_millis(250)) - 0.5).abs() < 1e-4);
        assert_eq!(effect.progress(t0 + Duration::from_secs(2)), 1.0);
    }
}
