//! Viewport adaptation: uniform scale and touch-device rotation
//!
//! The field stays 800x400 in simulation space. Touch devices see it rotated
//! a quarter turn so the long axis runs down a portrait screen; that is a
//! presentation transform only and never leaks into gameplay coordinates.

use crate::game::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::input::DeviceClass;

/// Smallest scale used unless configured otherwise
pub const DEFAULT_MIN_SCALE: f32 = 0.25;

/// Available container size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

/// Result of one layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub scale: f32,
    /// Field drawn rotated 90 degrees clockwise
    pub rotated: bool,
    /// Displayed canvas size in CSS pixels
    pub display_width: f32,
    pub display_height: f32,
}

impl Layout {
    /// Field coordinates to display pixels
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        if self.rotated {
            ((FIELD_HEIGHT - y) * self.scale, x * self.scale)
        } else {
            (x * self.scale, y * self.scale)
        }
    }

    /// Display pixels back to field coordinates
    pub fn unproject(&self, px: f32, py: f32) -> (f32, f32) {
        if self.rotated {
            (py / self.scale, FIELD_HEIGHT - px / self.scale)
        } else {
            (px / self.scale, py / self.scale)
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotated: false,
            display_width: FIELD_WIDTH,
            display_height: FIELD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutAdapter {
    device: DeviceClass,
    min_scale: f32,
}

impl LayoutAdapter {
    pub fn new(device: DeviceClass, min_scale: f32) -> Self {
        Self {
            device,
            min_scale: if min_scale.is_finite() && min_scale > 0.0 {
                min_scale
            } else {
                DEFAULT_MIN_SCALE
            },
        }
    }

    pub fn compute(&self, viewport: Viewport) -> Layout {
        let rotated = self.device == DeviceClass::Touch;
        let (logical_w, logical_h) = if rotated {
            (FIELD_HEIGHT, FIELD_WIDTH)
        } else {
            (FIELD_WIDTH, FIELD_HEIGHT)
        };

        let fit = (viewport.width / logical_w).min(viewport.height / logical_h);
        let scale = if fit.is_finite() {
            fit.max(self.min_scale)
        } else {
            self.min_scale
        };

        Layout {
            scale,
            rotated,
            display_width: logical_w * scale,
            display_height: logical_h * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_fits_landscape() {
        let adapter = LayoutAdapter::new(DeviceClass::Pointer, 0.25);
        let layout = adapter.compute(Viewport::new(1200.0, 900.0));
        assert_eq!(layout.scale, 1.5);
        assert!(!layout.rotated);
        assert_eq!((layout.display_width, layout.display_height), (1200.0, 600.0));
    }

    #[test]
    fn touch_rotates_for_portrait() {
        let adapter = LayoutAdapter::new(DeviceClass::Touch, 0.25);
        let layout = adapter.compute(Viewport::new(390.0, 844.0));
        assert!(layout.rotated);
        assert_eq!(layout.scale, 390.0 / 400.0);
        assert!(layout.display_height > layout.display_width);
    }

    #[test]
    fn never_drops_below_floor() {
        for device in [DeviceClass::Pointer, DeviceClass::Touch] {
            let adapter = LayoutAdapter::new(device, 0.4);
            for (w, h) in [(100.0, 50.0), (0.0, 0.0), (-10.0, 300.0), (f32::NAN, 10.0)] {
                assert!(adapter.compute(Viewport::new(w, h)).scale >= 0.4, "{w}x{h}");
            }
        }
    }

    #[test]
    fn invalid_floor_falls_back() {
        let adapter = LayoutAdapter::new(DeviceClass::Pointer, 0.0);
        assert_eq!(adapter.compute(Viewport::new(1.0, 1.0)).scale, DEFAULT_MIN_SCALE);
    }

    #[test]
    fn rotation_round_trips_field_coordinates() {
        let layout = LayoutAdapter::new(DeviceClass::Touch, 0.25).compute(Viewport::new(400.0, 800.0));
        let (px, py) = layout.project(60.0, 100.0);
        assert_eq!((px, py), (300.0, 60.0));
        assert_eq!(layout.unproject(px, py), (60.0, 100.0));
    }
}
