//! Full-width beam that fires on a fixed duty cycle
//!
//! The beam spans the whole window at its spawn height. With period `f` and
//! on-time `d` it is dangerous while `age mod f < d`.

use glam::Vec2;

use super::entity::{EntityBase, EntityKind};
use super::property::{EntityDesc, PropertyFlag};
use crate::consts::DEFAULT_BEAM_HEIGHT;
use crate::renderer::{Canvas, DrawParams, colors};

const DEFAULT_FREQUENCY: f32 = 2.0;
const DEFAULT_DURATION: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Beam {
    pub base: EntityBase,
    /// Period in seconds
    pub frequency: f32,
    /// On-time per period in seconds
    pub duration: f32,
    firing: bool,
}

impl Beam {
    pub fn new(desc: &EntityDesc, spawn_time: f32, bounds: Vec2) -> Self {
        let mut base = EntityBase::from_desc(EntityKind::Beam, desc, spawn_time);
        let height = desc
            .get_i32x2(PropertyFlag::SIZE)
            .map(|(_, h)| h as f32)
            .unwrap_or(DEFAULT_BEAM_HEIGHT);
        base.size = Vec2::new(bounds.x, height);
        base.bbox.pos = Vec2::new(0.0, base.start_pos.y);
        base.bbox.size = base.size;

        let frequency = desc.get_f32(PropertyFlag::FIRE_FREQUENCY).unwrap_or_else(|| {
            log::warn!("Beam: no FireFrequency, using {}", DEFAULT_FREQUENCY);
            DEFAULT_FREQUENCY
        });
        let duration = desc.get_f32(PropertyFlag::FIRE_DURATION).unwrap_or_else(|| {
            log::warn!("Beam: no FireDuration, using {}", DEFAULT_DURATION);
            DEFAULT_DURATION
        });

        Self {
            base,
            frequency,
            duration,
            firing: false,
        }
    }

    /// Duty-cycle test for a given time since spawn
    pub fn firing_at(&self, age: f32) -> bool {
        if age < 0.0 {
            return false;
        }
        if self.frequency <= 0.0 {
            return true;
        }
        age.rem_euclid(self.frequency) < self.duration
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn update(&mut self, now: f32) {
        if !self.base.alive {
            return;
        }
        if self.base.expired(now) {
            self.base.alive = false;
            self.firing = false;
            return;
        }
        self.firing = self.firing_at(self.base.age(now));
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.base.alive {
            return;
        }
        let bb = self.base.bbox;
        if self.firing {
            match self.base.image {
                Some(image) => {
                    canvas.draw_image(image, bb.pos, DrawParams::default().with_alpha(self.base.alpha))
                }
                None => {
                    let mid = bb.pos.y + bb.size.y * 0.5;
                    canvas.draw_line(Vec2::new(0.0, mid), Vec2::new(bb.size.x, mid), colors::BEAM_ACTIVE);
                }
            }
        } else {
            // Faint guide so the player can see where the beam will fire
            let mid = bb.pos.y + bb.size.y * 0.5;
            canvas.draw_line(Vec2::new(0.0, mid), Vec2::new(bb.size.x, mid), colors::BEAM_IDLE);
        }
    }
}
