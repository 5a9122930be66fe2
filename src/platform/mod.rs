//! Platform abstraction layer
//!
//! Handles:
//! - Time (the pausable game clock shared by the scheduler and entities)
//! - Input state polled once per frame

pub mod clock;
pub mod input;

pub use clock::{Clock, GameClock, ManualClock};
pub use input::InputState;
