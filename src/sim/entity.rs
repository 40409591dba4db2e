//! Ball entity state and kinematics
//!
//! Pure simulation data: no drawable handles live here. The renderer reads
//! these fields, never the reverse.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, in_bounds};
use crate::consts::EPSILON;

/// Physical properties of a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub mass: f32,
    /// Bounce-velocity retention on wall contact, in [0, 1]
    pub elasticity: f32,
    /// Linear speed loss per second while friction is enabled
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            mass: 100.0,
            elasticity: 0.0,
            friction: 0.01,
        }
    }
}

/// RGB colour tag, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);

    /// Normalized RGBA for vertex colours
    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            1.0,
        ]
    }
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub material: Material,
    pub color: Rgb,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            material: Material::default(),
            color: Rgb::RED,
        }
    }

    /// Advance one step of semi-implicit kinematics:
    /// `p += a·½·dt² + v·dt; v += a·dt`, snapping near-zero speeds to zero.
    pub fn integrate(&mut self, acceleration: Vec2, dt: f32) {
        self.pos += acceleration * 0.5 * dt * dt + self.vel * dt;
        let vel = self.vel + acceleration * dt;
        self.vel = if vel.length() > EPSILON { vel } else { Vec2::ZERO };
    }

    /// Integrate, then reduce the speed magnitude by `friction·dt` along the
    /// current direction. Linear drag, floored at zero.
    pub fn integrate_with_friction(&mut self, acceleration: Vec2, dt: f32) {
        self.pos += acceleration * 0.5 * dt * dt + self.vel * dt;
        let mut vel = self.vel + acceleration * dt;
        let mut speed = vel.length();
        if speed > EPSILON {
            let dir = vel / speed;
            speed = (speed - self.material.friction * dt).max(0.0);
            vel = dir * speed;
        }
        self.vel = if speed > EPSILON { vel } else { Vec2::ZERO };
    }

    /// Whole disc inside `bounds`
    #[inline]
    pub fn is_in_bounds(&self, bounds: Bounds) -> bool {
        in_bounds(self.pos, self.radius, bounds)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constant_velocity() {
        let mut ball = Ball::new(Vec2::new(10.0, 10.0), 5.0);
        ball.vel = Vec2::new(100.0, 0.0);
        ball.integrate(Vec2::ZERO, 0.5);
        assert!((ball.pos.x - 60.0).abs() < 1e-4);
        assert_eq!(ball.vel, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_acceleration_from_rest() {
        let mut ball = Ball::new(Vec2::ZERO, 5.0);
        ball.integrate(Vec2::new(0.0, 10.0), 2.0);
        // ½·a·t² = 20
        assert!((ball.pos.y - 20.0).abs() < 1e-4);
        assert!((ball.vel.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_tiny_velocity_snaps_to_zero() {
        let mut ball = Ball::new(Vec2::ZERO, 5.0);
        ball.vel = Vec2::new(1e-7, -1e-7);
        ball.integrate(Vec2::ZERO, 0.01);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_friction_is_linear() {
        let mut ball = Ball::new(Vec2::ZERO, 5.0);
        ball.material.friction = 10.0;
        ball.vel = Vec2::new(30.0, 40.0);
        ball.integrate_with_friction(Vec2::ZERO, 1.0);
        assert!((ball.speed() - 40.0).abs() < 1e-3);
        // Direction preserved
        assert!((ball.vel.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-4);
    }

    #[test]
    fn test_friction_stops_without_reversing() {
        let mut ball = Ball::new(Vec2::ZERO, 5.0);
        ball.material.friction = 100.0;
        ball.vel = Vec2::new(5.0, 0.0);
        ball.integrate_with_friction(Vec2::ZERO, 1.0);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn resting_ball_stays_put(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, steps in 1usize..500) {
            let mut ball = Ball::new(Vec2::new(x, y), 10.0);
            for _ in 0..steps {
                ball.integrate(Vec2::ZERO, crate::consts::SIM_DT);
            }
            prop_assert_eq!(ball.pos, Vec2::new(x, y));
            prop_assert_eq!(ball.vel, Vec2::ZERO);
        }
    }
}
