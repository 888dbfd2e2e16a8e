//! Shared fixtures for session tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use pong_live::input::{DeviceClass, Role};
use pong_live::render::{Canvas, DrawOp, Layout, Layer, RecordingCanvas, Sprite, TextStyle};
use pong_live::util::color::Rgb;
use pong_live::SessionConfig;

pub fn config(match_id: &str, role: Role, device: DeviceClass) -> SessionConfig {
    SessionConfig {
        match_id: match_id.to_string(),
        role,
        device,
        socket_url: format!("ws://127.0.0.1:1/ws/pong/{}/", match_id),
        frame_rate: 60,
        min_scale: 0.25,
        start_url: None,
    }
}

/// Recording canvas the test keeps a handle to after the session takes it
#[derive(Clone, Default)]
pub struct SharedCanvas(pub Arc<Mutex<RecordingCanvas>>);

impl SharedCanvas {
    pub fn texts(&self) -> Vec<String> {
        let canvas = self.0.lock().unwrap();
        canvas.texts().into_iter().map(String::from).collect()
    }

    pub fn frames(&self) -> u64 {
        self.0.lock().unwrap().frames()
    }

    pub fn layers(&self) -> Vec<Layer> {
        self.0.lock().unwrap().layers()
    }

    /// `(scale, rotated)` of the most recent frame
    pub fn frame_layout(&self) -> Option<(f32, bool)> {
        match self.0.lock().unwrap().ops().first() {
            Some(DrawOp::Frame { scale, rotated }) => Some((*scale, *rotated)),
            _ => None,
        }
    }
}

impl Canvas for SharedCanvas {
    fn begin_frame(&mut self, layout: &Layout) {
        self.0.lock().unwrap().begin_frame(layout)
    }
    fn begin_layer(&mut self, layer: Layer) {
        self.0.lock().unwrap().begin_layer(layer)
    }
    fn save(&mut self) {
        self.0.lock().unwrap().save()
    }
    fn restore(&mut self) {
        self.0.lock().unwrap().restore()
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.0.lock().unwrap().set_alpha(alpha)
    }
    fn set_shadow(&mut self, color: Rgb, blur: f32) {
        self.0.lock().unwrap().set_shadow(color, blur)
    }
    fn translate(&mut self, x: f32, y: f32) {
        self.0.lock().unwrap().translate(x, y)
    }
    fn rotate(&mut self, radians: f32) {
        self.0.lock().unwrap().rotate(radians)
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.0.lock().unwrap().fill_rect(x, y, w, h, color)
    }
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, width: f32) {
        self.0.lock().unwrap().stroke_rect(x, y, w, h, color, width)
    }
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb) {
        self.0.lock().unwrap().fill_circle(x, y, r, color)
    }
    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb, width: f32) {
        self.0.lock().unwrap().stroke_circle(x, y, r, color, width)
    }
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32) {
        self.0.lock().unwrap().line(from, to, color, width)
    }
    fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Rgb, width: f32) {
        self.0.lock().unwrap().stroke_polygon(points, color, width)
    }
    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32) {
        self.0.lock().unwrap().draw_sprite(sprite, x, y, w, h)
    }
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.0.lock().unwrap().fill_text(text, x, y, style)
    }
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.0.lock().unwrap().measure_text(text, size)
    }
}

pub fn snapshot(score_left: u32, score_right: u32) -> String {
    format!(
        r#"{{"type":"game_state","ball_x":400,"ball_y":200,"paddle_left_y":170,"paddle_right_y":170,"score_left":{},"score_right":{}}}"#,
        score_left, score_right
    )
}
