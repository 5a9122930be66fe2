//! Drawing interface
//!
//! The engine that actually puts pixels on screen lives outside this crate.
//! Entities draw through [`Canvas`], which exposes only the primitives the
//! game needs: images at a position with rotation/scale/tint, lines and text.

pub mod color;
pub mod recording;

pub use color::{Rgba, colors};
pub use recording::{DrawCommand, RecordingCanvas};

use glam::Vec2;

/// Opaque handle to an image owned by the engine's resource cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Per-draw transform and tint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Degrees, counter-clockwise around the image center
    pub rotation: f32,
    pub scale: f32,
    pub tint: Rgba,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: 1.0,
            tint: colors::WHITE,
        }
    }
}

impl DrawParams {
    pub fn rotated(rotation: f32) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Apply an opacity in 0..1 to the tint's alpha channel
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.tint.a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        self
    }
}

/// Drawing primitives provided by the engine
pub trait Canvas {
    /// Draw an image with its top-left corner at `pos`
    fn draw_image(&mut self, image: ImageHandle, pos: Vec2, params: DrawParams);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba);
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Rgba);
}
