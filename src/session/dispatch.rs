//! Routes decoded server messages into the model and the effect list

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::effects::{EffectKind, EffectList};
use crate::game::model::DEFAULT_EFFECT_SECS;
use crate::game::{GameModel, MatchState, FIELD_HEIGHT, FIELD_MARGIN, FIELD_WIDTH};
use crate::render::sprites::{glow_color, BUMPER_COLOR};
use crate::util::color::Rgb;
use crate::ws::protocol::{BorderSide, Collision, PowerupInfo, ServerMsg, Side};
use crate::ws::CloseReason;

/// Distance of a paddle hit from the field edge
const PADDLE_HIT_INSET: f32 = 60.0;

/// Apply one message. Returns the close reason for `game_over`.
pub fn dispatch(
    msg: ServerMsg,
    model: &mut GameModel,
    effects: &mut EffectList,
    now: Instant,
) -> Option<CloseReason> {
    trace!(kind = msg.kind(), "Dispatching");

    match msg {
        ServerMsg::GameState(payload) => model.apply_snapshot(MatchState::from(payload)),
        ServerMsg::Countdown { countdown_nb } => model.show_countdown(countdown_nb, now),
        ServerMsg::Scored { score_msg } => model.announce(score_msg, now),

        ServerMsg::PowerupSpawned { powerup } => {
            let color = orb_color(&powerup);
            effects.spawn(EffectKind::PowerupSpawn, (powerup.x, powerup.y), Some(color), now);
        }
        ServerMsg::PowerupExpired { powerup } => {
            let color = orb_color(&powerup);
            effects.spawn(EffectKind::PowerupExpire, (powerup.x, powerup.y), Some(color), now);
        }
        ServerMsg::BumperSpawned { bumper } => {
            effects.spawn(EffectKind::BumperSpawn, (bumper.x, bumper.y), Some(BUMPER_COLOR), now);
        }
        ServerMsg::BumperExpired { bumper } => {
            effects.spawn(EffectKind::BumperExpire, (bumper.x, bumper.y), Some(BUMPER_COLOR), now);
        }

        ServerMsg::CollisionEvent { collision } => {
            let (kind, at, color) = collision_spark(&collision, model.state());
            effects.spawn(kind, at, Some(color), now);
        }

        ServerMsg::PowerupApplied {
            player,
            effect,
            duration,
        } => {
            let duration = duration.unwrap_or(DEFAULT_EFFECT_SECS);
            model.apply_effect_applied(player, effect, duration, now);
        }

        ServerMsg::GameOver { winner } => {
            debug!(winner = ?winner, "Game over received");
            return Some(CloseReason::GameOver { winner });
        }
    }
    None
}

fn orb_color(powerup: &PowerupInfo) -> Rgb {
    powerup
        .color
        .map(Rgb::from)
        .unwrap_or_else(|| glow_color(&powerup.kind))
}

/// Where a collision spark appears and how it looks
fn collision_spark(collision: &Collision, state: &MatchState) -> (EffectKind, (f32, f32), Rgb) {
    match collision {
        Collision::PaddleCollision { paddle_side } => {
            let x = match paddle_side {
                Side::Left => PADDLE_HIT_INSET,
                Side::Right => FIELD_WIDTH - PADDLE_HIT_INSET,
            };
            (EffectKind::PaddleCollision, (x, state.ball.y), Rgb::WHITE)
        }
        Collision::BorderCollision {
            border_side,
            coor_x_collision,
        } => {
            let y = match border_side {
                BorderSide::Up => FIELD_MARGIN,
                BorderSide::Down => FIELD_HEIGHT - FIELD_MARGIN,
            };
            (EffectKind::BorderCollision, (*coor_x_collision, y), Rgb::WHITE)
        }
        Collision::BumperCollision { bumper_x, bumper_y } => {
            (EffectKind::BumperCollision, (*bumper_x, *bumper_y), BUMPER_COLOR)
        }
    }
}
