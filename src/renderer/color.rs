//! Pixel color type shared by image files and draw tints

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA pixel, laid out exactly as stored in image files
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BEAM_ACTIVE: Rgba = Rgba::new(255, 60, 40, 255);
    pub const BEAM_IDLE: Rgba = Rgba::new(255, 60, 40, 64);
    pub const HUD_TEXT: Rgba = Rgba::new(230, 230, 240, 255);
}
