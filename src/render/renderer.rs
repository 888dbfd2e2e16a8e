//! Per-frame drawing of the model, effects and HUD

use std::f32::consts::{PI, TAU};

use tokio::time::Instant;

use crate::effects::{EffectKind, EffectList, EphemeralEffect};
use crate::game::{GameModel, FIELD_HEIGHT, FIELD_MARGIN, FIELD_WIDTH};
use crate::util::color::Rgb;
use crate::ws::protocol::Side;

use super::canvas::{Canvas, Layer, TextAlign, TextStyle};
use super::layout::Layout;
use super::sprites::{badge_label, glow_color, SpriteCache, BUMPER_COLOR};

const BACKGROUND: Rgb = Rgb::hex(0x101A32);
const POWERUP_SIZE: f32 = 30.0;
const GLOW_BLUR: f32 = 10.0;
const BADGE_TOP: f32 = 60.0;
const BADGE_STEP: f32 = 25.0;

pub struct Renderer {
    sprites: SpriteCache,
    layout: Layout,
}

impl Renderer {
    pub fn new(layout: Layout) -> Self {
        Self {
            sprites: SpriteCache::new(),
            layout,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Paint one frame. Layer order is fixed; during a flash the play layers
    /// are whited out but effects, HUD and overlays still draw on top.
    pub fn draw_frame(
        &self,
        canvas: &mut dyn Canvas,
        model: &GameModel,
        effects: &EffectList,
        now: Instant,
    ) {
        canvas.begin_frame(&self.layout);
        let flash = model.flash_active();

        canvas.begin_layer(Layer::Background);
        let fill = if flash { Rgb::WHITE } else { BACKGROUND };
        canvas.fill_rect(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT, fill);

        if !flash {
            self.draw_field(canvas);
            self.draw_paddles(canvas, model);
            self.draw_ball(canvas, model);
            self.draw_powerups(canvas, model);
            self.draw_bumpers(canvas, model);
        }

        canvas.begin_layer(Layer::Effects);
        for effect in effects.iter() {
            draw_effect(canvas, effect, effect.progress(now));
        }

        self.draw_hud(canvas, model);
        self.draw_overlay(canvas, model);
    }

    fn glow(&self) -> f32 {
        GLOW_BLUR * self.layout.scale
    }

    fn draw_field(&self, canvas: &mut dyn Canvas) {
        canvas.begin_layer(Layer::Field);
        canvas.stroke_rect(
            FIELD_MARGIN,
            FIELD_MARGIN,
            FIELD_WIDTH - 2.0 * FIELD_MARGIN,
            FIELD_HEIGHT - 2.0 * FIELD_MARGIN,
            Rgb::WHITE,
            2.0,
        );
    }

    fn draw_paddles(&self, canvas: &mut dyn Canvas, model: &GameModel) {
        canvas.begin_layer(Layer::Paddles);
        let state = model.state();
        for side in Side::BOTH {
            let paddle = state.paddle(side);
            let x = match side {
                Side::Left => FIELD_MARGIN,
                Side::Right => FIELD_WIDTH - FIELD_MARGIN - paddle.width,
            };

            canvas.save();
            // Most recent badge decides the glow
            if let Some(effect) = model.badges(side).last() {
                canvas.set_shadow(glow_color(effect), self.glow());
            }
            canvas.fill_rect(x, paddle.y, paddle.width, paddle.height, Rgb::WHITE);
            canvas.restore();
        }
    }

    fn draw_ball(&self, canvas: &mut dyn Canvas, model: &GameModel) {
        canvas.begin_layer(Layer::Ball);
        let ball = &model.state().ball;
        canvas.fill_circle(ball.x, ball.y, ball.radius, Rgb::WHITE);
    }

    fn draw_powerups(&self, canvas: &mut dyn Canvas, model: &GameModel) {
        canvas.begin_layer(Layer::Powerups);
        let half = POWERUP_SIZE / 2.0;
        for orb in &model.state().powerups {
            let sprite = self.sprites.powerup(&orb.kind);
            canvas.save();
            canvas.set_shadow(sprite.glow, self.glow());
            canvas.draw_sprite(sprite, orb.x - half, orb.y - half, POWERUP_SIZE, POWERUP_SIZE);
            canvas.restore();
        }
    }

    fn draw_bumpers(&self, canvas: &mut dyn Canvas, model: &GameModel) {
        canvas.begin_layer(Layer::Bumpers);
        let sprite = self.sprites.bumper();
        for bumper in &model.state().bumpers {
            let r = bumper.radius;
            canvas.save();
            canvas.set_shadow(BUMPER_COLOR, self.glow());
            canvas.draw_sprite(sprite, bumper.x - r, bumper.y - r, r * 2.0, r * 2.0);
            canvas.restore();
        }
    }

    fn draw_hud(&self, canvas: &mut dyn Canvas, model: &GameModel) {
        canvas.begin_layer(Layer::Hud);
        let score = model.state().score;
        let style = TextStyle::plain(20.0, Rgb::WHITE);
        canvas.fill_text(&score.left.to_string(), 20.0, 30.0, &style);
        canvas.fill_text(&score.right.to_string(), FIELD_WIDTH - 40.0, 30.0, &style);

        for side in Side::BOTH {
            let mut y = BADGE_TOP;
            for effect in model.badges(side) {
                let label = badge_label(effect);
                let style = TextStyle::plain(16.0, glow_color(effect));
                let x = match side {
                    Side::Left => 20.0,
                    Side::Right => FIELD_WIDTH - 20.0 - canvas.measure_text(&label, style.size),
                };
                canvas.fill_text(&label, x, y, &style);
                y += BADGE_STEP;
            }
        }
    }

    fn draw_overlay(&self, canvas: &mut dyn Canvas, model: &GameModel) {
        let countdown = model.countdown();
        let announcement = model.announcement();
        if countdown.is_none() && announcement.is_none() {
            return;
        }

        canvas.begin_layer(Layer::Overlay);
        canvas.save();
        canvas.set_alpha(0.5);
        canvas.fill_rect(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT, Rgb::BLACK);
        canvas.restore();

        let big = |size: f32| TextStyle {
            size,
            bold: true,
            color: Rgb::WHITE,
            align: TextAlign::Center,
        };

        canvas.save();
        canvas.set_shadow(Rgb::WHITE, 20.0);
        if let Some(n) = countdown {
            canvas.fill_text(&n.to_string(), FIELD_WIDTH / 2.0, FIELD_HEIGHT / 3.0, &big(80.0));
        }
        if let Some(text) = announcement {
            canvas.fill_text(text, FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0, &big(40.0));
        }
        canvas.restore();
    }
}

fn draw_effect(canvas: &mut dyn Canvas, effect: &EphemeralEffect, p: f32) {
    let (x, y) = (effect.x, effect.y);
    let fade = 1.0 - p;

    canvas.save();
    canvas.set_alpha(fade);

    match effect.kind {
        EffectKind::PaddleCollision => {
            canvas.stroke_circle(x, y, 20.0 + p * 40.0, effect.color, 3.0 * fade);
        }
        EffectKind::BorderCollision => {
            canvas.set_shadow(effect.color, 15.0 * fade);
            canvas.fill_circle(x, y, 20.0 * fade, effect.color);
        }
        EffectKind::BumperCollision => {
            let reach = 30.0 * p;
            for i in 0..8 {
                let angle = i as f32 / 8.0 * TAU;
                let (s, c) = angle.sin_cos();
                canvas.line(
                    (x + c * 10.0, y + s * 10.0),
                    (x + c * reach, y + s * reach),
                    BUMPER_COLOR,
                    3.0 * fade,
                );
            }
        }
        EffectKind::PowerupSpawn => {
            for i in 0..3 {
                let ring = (p + i as f32 / 3.0) % 1.0;
                canvas.stroke_circle(x, y, ring * 40.0, effect.color, 2.0);
            }
            let distance = 20.0 + p * 20.0;
            for i in 0..8 {
                let (s, c) = (i as f32 / 8.0 * TAU).sin_cos();
                canvas.fill_circle(x + c * distance, y + s * distance, 2.0, effect.color);
            }
        }
        EffectKind::PowerupExpire => {
            let radius = 20.0 * fade;
            canvas.stroke_circle(x, y, radius, effect.color, 2.0 * fade);
            let distance = radius * 2.0 * p;
            for i in 0..6 {
                let (s, c) = (i as f32 / 6.0 * TAU).sin_cos();
                canvas.fill_circle(x + c * distance, y + s * distance, 2.0, effect.color);
            }
        }
        EffectKind::BumperSpawn => {
            let size = 40.0 * p;
            canvas.translate(x, y);
            canvas.rotate(p * PI);
            for k in [1.0, 1.5] {
                let d = size * k;
                canvas.stroke_polygon(&[(0.0, -d), (d, 0.0), (0.0, d), (-d, 0.0)], BUMPER_COLOR, 2.0);
            }
        }
        EffectKind::BumperExpire => {
            for i in 0..3 {
                let ring = 20.0 * ((p + i as f32 / 3.0) % 1.0);
                canvas.stroke_circle(x, y, ring, BUMPER_COLOR, 2.0 * fade);
                let distance = ring * (1.0 + p);
                for j in 0..8 {
                    let (s, c) = (j as f32 / 8.0 * TAU).sin_cos();
                    canvas.fill_rect(x + c * distance - 1.0, y + s * distance - 1.0, 2.0, 2.0, BUMPER_COLOR);
                }
            }
        }
    }

    canvas.restore();
}
