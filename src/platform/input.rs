//! Per-frame input snapshot

use glam::Vec2;

/// Input commands for a single frame, filled in by the engine's poll
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Mouse position; the balloon follows it
    pub mouse_pos: Vec2,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Quit the level (one-shot)
    pub quit: bool,
}
