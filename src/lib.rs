//! Balloon Dodge - a balloon-avoidance arcade game
//!
//! Core modules:
//! - `sim`: Entity descriptions, entity variants and the timed spawn scheduler
//! - `persistence`: Binary/text file formats and the pack archive
//! - `platform`: Pausable game clock and input state
//! - `renderer`: Drawing interface consumed by entities
//! - `audio`: Sound playback interface
//! - `settings`: JSON-backed player/game settings

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default window (level bounds) dimensions in pixels
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Fixed integration step for bouncing entities (seconds)
    pub const BOUNCE_STEP: f32 = 1.0 / 100.0;

    /// Entity size used when a description carries neither a size nor a resolvable image
    pub const DEFAULT_ENTITY_WIDTH: f32 = 32.0;
    pub const DEFAULT_ENTITY_HEIGHT: f32 = 32.0;

    /// Beam thickness when the description has no size
    pub const DEFAULT_BEAM_HEIGHT: f32 = 16.0;

    /// Ball spin in degrees per second when no RotationSpeed is given
    pub const DEFAULT_BALL_SPIN: f32 = 90.0;

    /// Player balloon radius
    pub const BALLOON_RADIUS: f32 = 20.0;

    /// Version stamped into every file header written by this crate
    pub const FILE_VERSION: f32 = 1.0;

    /// Archive format version
    pub const PACK_VERSION: u32 = 1;

    /// Archive element holding the binary entity descriptions
    pub const ENTITY_DESCRIPTIONS: &str = "EntityDescriptions";
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// DJB2 string hash with the top bit cleared.
///
/// Archive element names are stored only as this hash, so the function must
/// never change: `h = h * 33 + c` over the raw bytes, wrapping at 32 bits.
pub fn djb_hash(name: &str) -> u32 {
    let mut hash: u32 = 5381;
    for &c in name.as_bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(c));
    }
    hash & 0x7FFF_FFFF
}
