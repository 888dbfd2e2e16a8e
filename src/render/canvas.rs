//! Drawing surface abstraction and a recording implementation

use crate::util::color::Rgb;

use super::layout::Layout;
use super::sprites::Sprite;

/// Draw layers in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Field,
    Paddles,
    Ball,
    Powerups,
    Bumpers,
    Effects,
    Hud,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn plain(size: f32, color: Rgb) -> Self {
        Self {
            size,
            bold: false,
            color,
            align: TextAlign::Left,
        }
    }
}

/// 2D immediate-mode drawing in logical field coordinates.
///
/// `save`/`restore` bracket alpha, shadow and transform changes.
pub trait Canvas: Send {
    /// Apply the presentation transform for this frame
    fn begin_frame(&mut self, layout: &Layout);
    /// Marks where a layer starts; purely informational
    fn begin_layer(&mut self, _layer: Layer) {}

    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f32);
    fn set_shadow(&mut self, color: Rgb, blur: f32);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, width: f32);
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb);
    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb, width: f32);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32);
    fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Rgb, width: f32);
    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
    fn measure_text(&self, text: &str, size: f32) -> f32;
}

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Frame { scale: f32, rotated: bool },
    Layer(Layer),
    Save,
    Restore,
    Alpha(f32),
    Shadow { color: Rgb, blur: f32 },
    Translate(f32, f32),
    Rotate(f32),
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Rgb },
    StrokeRect { x: f32, y: f32, w: f32, h: f32, color: Rgb },
    FillCircle { x: f32, y: f32, r: f32, color: Rgb },
    StrokeCircle { x: f32, y: f32, r: f32, color: Rgb },
    Line { from: (f32, f32), to: (f32, f32), color: Rgb },
    Polygon { points: usize, color: Rgb },
    Sprite { key: String, x: f32, y: f32, w: f32, h: f32 },
    Text { text: String, x: f32, y: f32, color: Rgb },
}

/// Keeps the ops of the most recent frame; used headless and in tests
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    frames: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Layers in the order they were started
    pub fn layers(&self) -> Vec<Layer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ops recorded between the start of `layer` and the next layer marker
    pub fn layer_ops(&self, layer: Layer) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .skip_while(|op| **op != DrawOp::Layer(layer))
            .skip(1)
            .take_while(|op| !matches!(op, DrawOp::Layer(_)))
            .collect()
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl Canvas for RecordingCanvas {
    fn begin_frame(&mut self, layout: &Layout) {
        self.ops.clear();
        self.frames += 1;
        self.push(DrawOp::Frame {
            scale: layout.scale,
            rotated: layout.rotated,
        });
    }

    fn begin_layer(&mut self, layer: Layer) {
        self.push(DrawOp::Layer(layer));
    }

    fn save(&mut self) {
        self.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.push(DrawOp::Restore);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.push(DrawOp::Alpha(alpha));
    }

    fn set_shadow(&mut self, color: Rgb, blur: f32) {
        self.push(DrawOp::Shadow { color, blur });
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.push(DrawOp::Translate(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.push(DrawOp::Rotate(radians));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.push(DrawOp::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, _width: f32) {
        self.push(DrawOp::StrokeRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb) {
        self.push(DrawOp::FillCircle { x, y, r, color });
    }

    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb, _width: f32) {
        self.push(DrawOp::StrokeCircle { x, y, r, color });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, _width: f32) {
        self.push(DrawOp::Line { from, to, color });
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Rgb, _width: f32) {
        self.push(DrawOp::Polygon {
            points: points.len(),
            color,
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32) {
        self.push(DrawOp::Sprite {
            key: sprite.key.clone(),
            x,
            y,
            w,
            h,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            color: style.color,
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        // Rough Arial advance
        text.chars().count() as f32 * size * 0.6
    }
}
