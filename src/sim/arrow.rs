//! Straight-flying projectile

use glam::Vec2;

use super::entity::{EntityBase, EntityKind, velocity_of};
use super::property::{EntityDesc, PropertyFlag};
use crate::renderer::{Canvas, DrawParams};
use crate::rotate_degrees;

#[derive(Debug, Clone)]
pub struct Arrow {
    pub base: EntityBase,
    /// Velocity after the spawn rotation is applied
    pub velocity: Vec2,
    /// Degrees; also the draw rotation
    pub rotation: f32,
    /// Window size; arrows die once they have flown out of it
    bounds: Vec2,
}

impl Arrow {
    pub fn new(kind: EntityKind, desc: &EntityDesc, spawn_time: f32, bounds: Vec2) -> Self {
        let base = EntityBase::from_desc(kind, desc, spawn_time);
        let rotation = desc.get_f32(PropertyFlag::ROTATION).unwrap_or(0.0);
        let velocity = rotate_degrees(velocity_of(kind, desc), rotation);
        Self {
            base,
            velocity,
            rotation,
            bounds,
        }
    }

    pub fn position_at(&self, now: f32) -> Vec2 {
        self.base.start_pos + self.velocity * self.base.age(now).max(0.0)
    }

    /// Fully outside the window and not heading back in
    fn left_window(&self, pos: Vec2) -> bool {
        let size = self.base.size;
        let v = self.velocity;
        let gone_x = (pos.x + size.x < 0.0 && v.x <= 0.0) || (pos.x > self.bounds.x && v.x >= 0.0);
        let gone_y = (pos.y + size.y < 0.0 && v.y <= 0.0) || (pos.y > self.bounds.y && v.y >= 0.0);
        gone_x || gone_y
    }

    pub fn update(&mut self, now: f32) {
        if !self.base.alive {
            return;
        }
        let pos = self.position_at(now);
        self.base.bbox.pos = pos;
        self.base.bbox.rotation = self.rotation;

        if self.base.expired(now) || self.left_window(pos) {
            self.base.alive = false;
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.base.alive {
            return;
        }
        if let Some(image) = self.base.image {
            let params = DrawParams::rotated(self.rotation).with_alpha(self.base.alpha);
            canvas.draw_image(image, self.base.bbox.pos, params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, ImageHandle, RecordingCanvas};
    use crate::sim::property::Handle;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn desc(x: i32, y: i32, vx: i32, vy: i32) -> EntityDesc {
        let mut d = EntityDesc::new();
        d.set_i32x2(PropertyFlag::POSITION, x, y).unwrap();
        d.set_i32x2(PropertyFlag::VELOCITY, vx, vy).unwrap();
        d.set_i32x2(PropertyFlag::SIZE, 10, 10).unwrap();
        d
    }

    #[test]
    fn test_linear_motion_from_spawn_time() {
        let mut arrow = Arrow::new(EntityKind::Arrow, &desc(100, 100, 50, 0), 2.0, BOUNDS);
        arrow.update(1.0);
        assert_eq!(arrow.base.bbox.pos, Vec2::new(100.0, 100.0));
        arrow.update(4.0);
        assert_eq!(arrow.base.bbox.pos, Vec2::new(200.0, 100.0));
        assert!(arrow.base.alive);
    }

    #[test]
    fn test_rotation_turns_velocity() {
        let mut d = desc(0, 0, 10, 0);
        d.set_f32(PropertyFlag::ROTATION, 90.0).unwrap();
        let arrow = Arrow::new(EntityKind::Arrow, &d, 0.0, BOUNDS);
        assert!(arrow.velocity.x.abs() < 1e-4);
        assert!((arrow.velocity.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_timed_arrow_expires() {
        let mut d = desc(100, 100, 0, 0);
        d.set_f32(PropertyFlag::LIFETIME, 1.5).unwrap();
        let mut arrow = Arrow::new(EntityKind::TimedArrow, &d, 1.0, BOUNDS);
        arrow.update(2.4);
        assert!(arrow.base.alive);
        arrow.update(2.5);
        assert!(!arrow.base.alive);
    }

    #[test]
    fn test_offscreen_entry_is_kept_until_it_leaves() {
        // Starts left of the window flying right
        let mut arrow = Arrow::new(EntityKind::Arrow, &desc(-50, 100, 100, 0), 0.0, BOUNDS);
        arrow.update(0.0);
        assert!(arrow.base.alive);
        arrow.update(9.0);
        assert!(!arrow.base.alive);
    }

    #[test]
    fn test_draw_uses_image_and_alpha() {
        let mut d = desc(5, 6, 0, 0);
        d.set_handle(PropertyFlag::IMAGE, Handle(2)).unwrap();
        d.set_f32(PropertyFlag::ALPHA, 0.5).unwrap();
        let mut arrow = Arrow::new(EntityKind::Arrow, &d, 0.0, BOUNDS);
        arrow.update(0.0);

        let mut canvas = RecordingCanvas::new();
        arrow.draw(&mut canvas);
        match &canvas.commands[..] {
            [DrawCommand::Image { image, pos, params }] => {
                assert_eq!(*image, ImageHandle(2));
                assert_eq!(*pos, Vec2::new(5.0, 6.0));
                assert_eq!(params.tint.a, 128);
            }
            other => panic!("unexpected draw calls {other:?}"),
        }
    }

    #[test]
    fn test_missing_image_draws_nothing() {
        let mut arrow = Arrow::new(EntityKind::Arrow, &desc(5, 6, 0, 0), 0.0, BOUNDS);
        arrow.update(0.0);
        let mut canvas = RecordingCanvas::new();
        arrow.draw(&mut canvas);
        assert!(canvas.commands.is_empty());
    }
}
