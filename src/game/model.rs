//! Game state model: the snapshot mirror plus client-owned overlays
//! (power-up badges, flash, countdown and score announcement).
//!
//! Snapshots replace `MatchState` wholesale. Everything else in here is owned
//! by the client and only ever removed by its own timer or by `clear`.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::effects::TimerSet;
use crate::util::time::secs;
use crate::ws::protocol::{PowerupKind, Side};

use super::state::MatchState;

/// How long the flash whiteout lasts
pub const FLASH_DURATION: Duration = Duration::from_millis(300);
/// How long a score announcement stays up
pub const ANNOUNCEMENT_DURATION: Duration = Duration::from_millis(1500);
/// A countdown value disappears if the next one is this late
pub const COUNTDOWN_TIMEOUT: Duration = Duration::from_millis(1500);
/// Badge lifetime when the server leaves `duration` out
pub const DEFAULT_EFFECT_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TimerKey {
    Badge(Side, PowerupKind),
    Flash,
    Countdown,
    Announcement,
}

impl PowerupKind {
    /// Side whose badge shows this effect when `player` picked it up.
    /// Buffs stay with the picker; everything else marks the opponent.
    pub fn display_side(&self, player: Side) -> Side {
        match self {
            PowerupKind::Speed | PowerupKind::Sticky => player,
            _ => player.opponent(),
        }
    }
}

/// Local mirror read by the renderer
#[derive(Debug, Default)]
pub struct GameModel {
    state: MatchState,
    left_badges: Vec<PowerupKind>,
    right_badges: Vec<PowerupKind>,
    flash: bool,
    countdown: Option<i32>,
    announcement: Option<String>,
    timers: TimerSet<TimerKey>,
}

impl GameModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Replace the authoritative fields. Badges and overlays are untouched.
    pub fn apply_snapshot(&mut self, snapshot: MatchState) {
        self.state = snapshot;
    }

    /// Record a `powerup_applied` event. Returns the side the badge went to,
    /// or `None` for flash (no badge) and for durations past the clock's range.
    pub fn apply_effect_applied(
        &mut self,
        player: Side,
        effect: PowerupKind,
        duration_secs: f64,
        now: Instant,
    ) -> Option<Side> {
        if effect == PowerupKind::Flash {
            self.trigger_flash(now);
            return None;
        }

        let Some(expires) = now.checked_add(secs(duration_secs)) else {
            warn!(%player, %effect, duration_secs, "Effect duration out of range, ignoring");
            return None;
        };

        let side = effect.display_side(player);
        let badges = self.badges_mut(side);
        if !badges.contains(&effect) {
            badges.push(effect.clone());
        }

        let restarted = self
            .timers
            .arm(TimerKey::Badge(side, effect.clone()), expires);
        debug!(%player, %side, %effect, duration_secs, restarted, "Badge armed");
        Some(side)
    }

    pub fn trigger_flash(&mut self, now: Instant) {
        self.flash = true;
        self.timers.arm(TimerKey::Flash, now + FLASH_DURATION);
    }

    /// Countdown overlay; zero or below hides it
    pub fn show_countdown(&mut self, value: i32, now: Instant) {
        if value <= 0 {
            self.countdown = None;
            self.timers.cancel(&TimerKey::Countdown);
        } else {
            self.countdown = Some(value);
            self.timers.arm(TimerKey::Countdown, now + COUNTDOWN_TIMEOUT);
        }
    }

    pub fn announce(&mut self, text: String, now: Instant) {
        self.announcement = Some(text);
        self.timers
            .arm(TimerKey::Announcement, now + ANNOUNCEMENT_DURATION);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Fire due timers. Each expiry removes exactly what it governs.
    pub fn expire(&mut self, now: Instant) -> usize {
        let due = self.timers.drain_due(now);
        for key in &due {
            match key {
                TimerKey::Badge(side, effect) => {
                    debug!(%side, %effect, "Badge expired");
                    self.badges_mut(*side).retain(|e| e != effect);
                }
                TimerKey::Flash => self.flash = false,
                TimerKey::Countdown => self.countdown = None,
                TimerKey::Announcement => self.announcement = None,
            }
        }
        due.len()
    }

    /// Drop every overlay and timer (session teardown)
    pub fn clear(&mut self) {
        self.timers.clear();
        self.left_badges.clear();
        self.right_badges.clear();
        self.flash = false;
        self.countdown = None;
        self.announcement = None;
    }

    pub fn badges(&self, side: Side) -> &[PowerupKind] {
        match side {
            Side::Left => &self.left_badges,
            Side::Right => &self.right_badges,
        }
    }

    pub fn flash_active(&self) -> bool {
        self.flash || self.state.server_flash
    }

    pub fn countdown(&self) -> Option<i32> {
        self.countdown
    }

    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn badges_mut(&mut self, side: Side) -> &mut Vec<PowerupKind> {
        match side {
            Side::Left => &mut self.left_badges,
            Side::Right => &mut self.right_badges,
        }
    }
}
