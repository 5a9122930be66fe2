//! Bouncing ball
//!
//! Position is integrated with a fixed step from spawn time up to the query
//! time on every update. That costs O(age / step) per frame but makes the
//! result depend only on the query time, never on the frame history.

use glam::Vec2;

use super::entity::{EntityBase, EntityKind, velocity_of};
use super::property::{EntityDesc, PropertyFlag};
use crate::consts::DEFAULT_BALL_SPIN;
use crate::renderer::{Canvas, DrawParams};
use crate::rotate_degrees;

#[derive(Debug, Clone)]
pub struct Ball {
    pub base: EntityBase,
    pub start_velocity: Vec2,
    /// Velocity at the last update
    pub velocity: Vec2,
    /// Spin in degrees/second
    pub spin: f32,
    /// Random rotation offset chosen at construction
    pub phase: f32,
    pub rotation: f32,
    bounds: Vec2,
    step: f32,
}

impl Ball {
    pub fn new(
        kind: EntityKind,
        desc: &EntityDesc,
        spawn_time: f32,
        bounds: Vec2,
        step: f32,
        phase: f32,
    ) -> Self {
        let base = EntityBase::from_desc(kind, desc, spawn_time);
        let turn = desc.get_f32(PropertyFlag::ROTATION).unwrap_or(0.0);
        let start_velocity = rotate_degrees(velocity_of(kind, desc), turn);
        Self {
            base,
            start_velocity,
            velocity: start_velocity,
            spin: desc
                .get_f32(PropertyFlag::ROTATION_SPEED)
                .unwrap_or(DEFAULT_BALL_SPIN),
            phase,
            rotation: phase,
            bounds,
            step: step.max(1e-4),
        }
    }

    /// Reflect off the window edges, keeping the ball inside. Travel past
    /// a wall is mirrored back so no distance is lost at contact.
    fn bounce(&self, pos: &mut Vec2, vel: &mut Vec2) {
        let max = (self.bounds - self.base.size).max(Vec2::ZERO);
        reflect_axis(&mut pos.x, &mut vel.x, max.x);
        reflect_axis(&mut pos.y, &mut vel.y, max.y);
    }

    /// Integrate from spawn to `now`; returns (position, velocity)
    pub fn simulate(&self, now: f32) -> (Vec2, Vec2) {
        let mut pos = self.base.start_pos;
        let mut vel = self.start_velocity;
        let age = self.base.age(now);
        if age <= 0.0 {
            return (pos, vel);
        }

        let whole_steps = (age / self.step).floor() as u32;
        for _ in 0..whole_steps {
            pos += vel * self.step;
            self.bounce(&mut pos, &mut vel);
        }
        let rest = age - whole_steps as f32 * self.step;
        if rest > 0.0 {
            pos += vel * rest;
            self.bounce(&mut pos, &mut vel);
        }
        (pos, vel)
    }

    pub fn update(&mut self, now: f32) {
        if !self.base.alive {
            return;
        }
        if self.base.expired(now) {
            self.base.alive = false;
            return;
        }
        let (pos, vel) = self.simulate(now);
        self.velocity = vel;
        self.rotation = (self.phase + self.spin * self.base.age(now).max(0.0)).rem_euclid(360.0);
        self.base.bbox.pos = pos;
        self.base.bbox.rotation = self.rotation;
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

fn reflect_axis(p: &mut f32, v: &mut f32, max: f32) {
    if *p < 0.0 {
        *p = (-*p).min(max);
        *v = v.abs();
    } else if *p > max {
        *p = (2.0 * max - *p).max(0.0);
        *v = -v.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn ball(x: i32, y: i32, vx: i32, vy: i32) -> Ball {
        let mut d = EntityDesc::new();
        d.set_i32x2(PropertyFlag::POSITION, x, y).unwrap();
        d.set_i32x2(PropertyFlag::VELOCITY, vx, vy).unwrap();
        d.set_i32x2(PropertyFlag::SIZE, 20, 20).unwrap();
        Ball::new(EntityKind::Ball, &d, 0.0, BOUNDS, 0.01, 0.0)
    }

    #[test]
    fn test_bounce_off_right_edge() {
        // 10px from the right wall moving right and down at 100px/s
        let mut b = ball(770, 100, 100, 100);
        b.update(0.5);
        assert!(b.velocity.x < 0.0, "horizontal velocity should flip");
        assert!(b.velocity.y > 0.0);
        let pos = b.base.bbox.pos;
        assert!(pos.x >= 0.0 && pos.x <= BOUNDS.x - 20.0);
        // 0.1s to the wall, then 0.4s back
        assert!((pos.x - 740.0).abs() < 0.1, "x = {}", pos.x);
        assert!((pos.y - 150.0).abs() < 0.1, "y = {}", pos.y);
    }

    #[test]
    fn test_repeated_bounces_do_not_drift() {
        // Vertical travel of 100px/s in a 580px lane: after 5s it has
        // covered 500px down from 100, reflecting once off the bottom.
        let mut b = ball(770, 100, 100, 100);
        b.update(5.0);
        let pos = b.base.bbox.pos;
        // Horizontal: 10 to the right wall, 490 back to x=290
        assert!((pos.x - 290.0).abs() < 0.5, "x = {}", pos.x);
        assert!((pos.y - 560.0).abs() < 0.5, "y = {}", pos.y);
    }

    #[test]
    fn test_overshoot_is_mirrored() {
        let b = ball(0, 0, 0, 0);
        let (mut p, mut v) = (Vec2::new(783.0, -4.0), Vec2::new(50.0, -20.0));
        b.bounce(&mut p, &mut v);
        assert_eq!(p, Vec2::new(777.0, 4.0));
        assert_eq!(v, Vec2::new(-50.0, 20.0));
    }

    #[test]
    fn test_stays_inside_over_long_runs() {
        let mut b = ball(400, 300, 373, -291);
        for i in 0..200 {
            b.update(i as f32 * 0.37);
            let p = b.base.bbox.pos;
            assert!(p.x >= 0.0 && p.x <= 780.0);
            assert!(p.y >= 0.0 && p.y <= 580.0);
        }
    }

    #[test]
    fn test_simulation_is_history_independent() {
        let mut a = ball(100, 100, 250, 170);
        let mut b = ball(100, 100, 250, 170);
        for i in 0..50 {
            a.update(i as f32 * 0.1);
        }
        a.update(7.3);
        b.update(7.3);
        assert_eq!(a.base.bbox.pos, b.base.bbox.pos);
        assert_eq!(a.velocity, b.velocity);
    }

    #[test]
    fn test_rotation_accumulates_from_phase() {
        let mut d = EntityDesc::new();
        d.set_i32x2(PropertyFlag::POSITION, 0, 0).unwrap();
        d.set_i32x2(PropertyFlag::VELOCITY, 0, 0).unwrap();
        d.set_f32(PropertyFlag::ROTATION_SPEED, 30.0).unwrap();
        let mut b = Ball::new(EntityKind::Ball, &d, 1.0, BOUNDS, 0.01, 100.0);
        b.update(3.0);
        assert!((b.rotation - 160.0).abs() < 1e-3);
        b.update(12.0);
        assert!((b.rotation - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_timed_ball_expires() {
        let mut d = EntityDesc::new();
        d.set_i32x2(PropertyFlag::POSITION, 0, 0).unwrap();
        d.set_i32x2(PropertyFlag::VELOCITY, 10, 10).unwrap();
        d.set_f32(PropertyFlag::LIFETIME, 2.0).unwrap();
        let mut b = Ball::new(EntityKind::TimedBall, &d, 0.0, BOUNDS, 0.01, 0.0);
        b.update(1.9);
        assert!(b.base.alive);
        b.update(2.0);
        assert!(!b.base.alive);
    }
}
