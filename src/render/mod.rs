//! Adaptive renderer: layout adapter plus the frame painter

pub mod canvas;
pub mod layout;
pub mod renderer;
pub mod sprites;

pub use canvas::{Canvas, DrawOp, Layer, RecordingCanvas, TextAlign, TextStyle};
pub use layout::{Layout, LayoutAdapter, Viewport};
pub use renderer::Renderer;
pub use sprites::{Sprite, SpriteCache};
