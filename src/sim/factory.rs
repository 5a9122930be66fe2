//! Entity construction by base type name

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arrow::Arrow;
use super::ball::Ball;
use super::beam::Beam;
use super::entity::{Entity, EntityKind};
use super::property::{EntityDesc, PropertyFlag};
use crate::settings::Settings;

/// Base type names understood by the factory
const REGISTRY: &[(&str, EntityKind)] = &[
    ("Default", EntityKind::Arrow),
    ("Arrow", EntityKind::Arrow),
    ("TimedArrow", EntityKind::TimedArrow),
    ("Ball", EntityKind::Ball),
    ("TimedBall", EntityKind::TimedBall),
    ("Beam", EntityKind::Beam),
];

/// Exact-match lookup; anything unknown is an arrow
pub fn kind_for_name(base_type: &str) -> EntityKind {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == base_type)
        .map(|&(_, kind)| kind)
        .unwrap_or_else(|| {
            log::warn!("unknown base entity '{}', using Arrow", base_type);
            EntityKind::Arrow
        })
}

/// Builds entities for one level
#[derive(Debug, Clone)]
pub struct EntityFactory {
    bounds: Vec2,
    bounce_step: f32,
    rng: Pcg32,
}

impl EntityFactory {
    pub fn new(bounds: Vec2, bounce_step: f32, seed: u64) -> Self {
        Self {
            bounds,
            bounce_step,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::new(
            Vec2::new(settings.window_width, settings.window_height),
            settings.bounce_step,
            seed,
        )
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Create an entity of `base_type` from a description. Never fails.
    pub fn create(&mut self, base_type: &str, desc: &EntityDesc, spawn_time: f32) -> Entity {
        let kind = kind_for_name(base_type);
        let entity = match kind {
            EntityKind::Arrow | EntityKind::TimedArrow => {
                Entity::Arrow(Arrow::new(kind, desc, spawn_time, self.bounds))
            }
            EntityKind::Ball | EntityKind::TimedBall => {
                let phase = self.rng.random_range(0.0..360.0);
                Entity::Ball(Ball::new(kind, desc, spawn_time, self.bounds, self.bounce_step, phase))
            }
            EntityKind::Beam => Entity::Beam(Beam::new(desc, spawn_time, self.bounds)),
        };
        log::debug!("created {} for t={:.2}", kind.as_str(), spawn_time);
        entity
    }

    /// Create using the description's own `BaseEntity`, defaulting to "Default"
    pub fn create_from_desc(&mut self, desc: &EntityDesc, spawn_time: f32) -> Entity {
        let base = desc
            .get_str(PropertyFlag::BASE_ENTITY)
            .unwrap_or("Default")
            .to_owned();
        self.create(&base, desc, spawn_time)
    }
}
