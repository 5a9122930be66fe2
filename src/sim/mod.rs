//! Gameplay simulation
//!
//! Entities are driven by the level clock's elapsed time rather than by
//! per-frame deltas, so every query for a given time gives the same answer.
//! Nothing here touches the screen or the sound card directly; drawing and
//! playback go through the renderer and audio traits.

pub mod arrow;
pub mod ball;
pub mod beam;
pub mod collision;
pub mod entity;
pub mod entity_gen;
pub mod factory;
pub mod level;
pub mod property;
pub mod session;

pub use arrow::Arrow;
pub use ball::Ball;
pub use beam::Beam;
pub use collision::BoundingBox;
pub use entity::{Entity, EntityBase, EntityKind};
pub use entity_gen::{EntityCreateEntry, EntityGen, GenState};
pub use factory::{EntityFactory, kind_for_name};
pub use level::LevelAssets;
pub use property::{EntityDesc, EntityProperty, Handle, PropertyFlag, PropertyValue};
pub use session::{LevelSession, SessionEvent, SessionPhase};
