//! Live entities
//!
//! Entities are a closed set of variants built by the factory from an
//! [`EntityDesc`]. Each one derives its state purely from the level clock's
//! elapsed time, so updating is idempotent for a given time.

use glam::Vec2;

use super::arrow::Arrow;
use super::ball::Ball;
use super::beam::Beam;
use super::collision::BoundingBox;
use super::property::{EntityDesc, PropertyFlag};
use crate::audio::{AudioManager, SoundHandle};
use crate::consts::*;
use crate::renderer::{Canvas, ImageHandle};

/// Variant tag reported by every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Arrow,
    /// Arrow that disappears after its lifetime
    TimedArrow,
    Ball,
    /// Ball that disappears after its lifetime
    TimedBall,
    Beam,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Arrow => "Arrow",
            EntityKind::TimedArrow => "TimedArrow",
            EntityKind::Ball => "Ball",
            EntityKind::TimedBall => "TimedBall",
            EntityKind::Beam => "Beam",
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, EntityKind::TimedArrow | EntityKind::TimedBall)
    }
}

/// State every variant shares
#[derive(Debug, Clone)]
pub struct EntityBase {
    pub kind: EntityKind,
    /// Level time at which the entity enters play
    pub spawn_time: f32,
    pub start_pos: Vec2,
    pub size: Vec2,
    pub alpha: f32,
    pub image: Option<ImageHandle>,
    pub sound: Option<SoundHandle>,
    /// Seconds after spawn before the entity leaves play
    pub lifetime: Option<f32>,
    pub alive: bool,
    pub bbox: BoundingBox,
}

impl EntityBase {
    /// Read the shared properties; absent ones fall back to defaults
    pub fn from_desc(kind: EntityKind, desc: &EntityDesc, spawn_time: f32) -> Self {
        let start_pos = match desc.get_i32x2(PropertyFlag::POSITION) {
            Some((x, y)) => Vec2::new(x as f32, y as f32),
            None => {
                log::warn!("{}: no Position, spawning at origin", kind.as_str());
                Vec2::ZERO
            }
        };
        let size = desc
            .get_i32x2(PropertyFlag::SIZE)
            .map(|(w, h)| Vec2::new(w as f32, h as f32))
            .unwrap_or(Vec2::new(DEFAULT_ENTITY_WIDTH, DEFAULT_ENTITY_HEIGHT));

        let lifetime = desc.get_f32(PropertyFlag::LIFETIME);
        if kind.is_timed() && lifetime.is_none() {
            log::warn!("{}: no Lifetime, entity will never expire", kind.as_str());
        }

        Self {
            kind,
            spawn_time,
            start_pos,
            size,
            alpha: desc.get_f32(PropertyFlag::ALPHA).unwrap_or(1.0),
            image: desc.image(),
            sound: desc.sound(),
            lifetime,
            alive: true,
            bbox: BoundingBox::new(start_pos, size, 0.0),
        }
    }

    /// Seconds since spawn (negative before spawn)
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawn_time
    }

    pub fn expired(&self, now: f32) -> bool {
        self.lifetime
            .is_some_and(|life| now >= self.spawn_time + life)
    }
}

/// Read a velocity property, warning when it is missing
pub(crate) fn velocity_of(kind: EntityKind, desc: &EntityDesc) -> Vec2 {
    match desc.get_i32x2(PropertyFlag::VELOCITY) {
        Some((x, y)) => Vec2::new(x as f32, y as f32),
        None => {
            log::warn!("{}: no Velocity, entity will not move", kind.as_str());
            Vec2::ZERO
        }
    }
}

/// A live game entity
#[derive(Debug, Clone)]
pub enum Entity {
    Arrow(Arrow),
    Ball(Ball),
    Beam(Beam),
}

impl Entity {
    pub fn base(&self) -> &EntityBase {
        match self {
            Entity::Arrow(e) => &e.base,
            Entity::Ball(e) => &e.base,
            Entity::Beam(e) => &e.base,
        }
    }

    /// Recompute position/state for level time `now`
    pub fn update(&mut self, now: f32) {
        match self {
            Entity::Arrow(e) => e.update(now),
            Entity::Ball(e) => e.update(now),
            Entity::Beam(e) => e.update(now),
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        match self {
            Entity::Arrow(e) => e.draw(canvas),
            Entity::Ball(e) => e.draw(canvas),
            Entity::Beam(e) => e.draw(canvas),
        }
    }

    /// Dangerous right now (collides with the player)
    pub fn is_active(&self) -> bool {
        match self {
            Entity::Beam(e) => e.base.alive && e.is_firing(),
            _ => self.base().alive,
        }
    }

    /// Still in play; dead entities are dropped from the active list
    pub fn is_alive(&self) -> bool {
        self.base().alive
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.base().bbox
    }

    pub fn kind(&self) -> EntityKind {
        self.base().kind
    }

    pub fn spawn_time(&self) -> f32 {
        self.base().spawn_time
    }

    /// Hits a circle if currently active and overlapping
    pub fn collides_with_circle(&self, center: Vec2, radius: f32) -> bool {
        self.is_active() && self.bounding_box().intersects_circle(center, radius)
    }

    pub fn play_spawn_sound(&self, audio: &mut AudioManager) {
        if let Some(sound) = self.base().sound {
            audio.play(sound);
        }
    }
}
