//! Force-driven bouncing ball
//!
//! Held directions push the ball with a constant force. Friction can be
//! toggled on and off; walls reflect the ball using its elasticity.

use glam::Vec2;

use super::clock::Simulation;
use super::collision::{Bounds, WallContact, wall_bounce};
use super::entity::{Ball, Rgb};
use crate::input::Directions;
use crate::settings::BounceSettings;

/// Ball colour while friction is off
pub const COLOR_NO_FRICTION: Rgb = Rgb::GREEN;
/// Ball colour while friction is on
pub const COLOR_FRICTION: Rgb = Rgb::RED;

/// Input for one bounce-demo tick
#[derive(Debug, Clone, Default)]
pub struct BounceInput {
    pub directions: Directions,
    /// One-shot: flip friction on/off
    pub toggle_friction: bool,
}

/// Complete state of the bounce demo
#[derive(Debug, Clone)]
pub struct BounceSim {
    pub bounds: Bounds,
    pub ball: Ball,
    pub force: f32,
    pub friction_enabled: bool,
    /// Walls touched during the most recent tick
    pub last_contact: WallContact,
}

impl BounceSim {
    pub fn new(settings: &BounceSettings) -> Self {
        let bounds = Bounds::new(settings.window_width as f32, settings.window_height as f32);
        let mut ball = Ball::new(bounds.center(), settings.radius);
        ball.material = settings.material;
        ball.color = COLOR_NO_FRICTION;
        Self {
            bounds,
            ball,
            force: settings.force,
            friction_enabled: false,
            last_contact: WallContact::default(),
        }
    }

    /// Acceleration from the held directions: `dir·force/mass`
    pub fn acceleration(&self, directions: &Directions) -> Vec2 {
        directions.unit() * self.force / self.ball.material.mass
    }
}

impl Simulation for BounceSim {
    type Input = BounceInput;

    fn tick(&mut self, input: &BounceInput, dt: f32) {
        if input.toggle_friction {
            self.friction_enabled = !self.friction_enabled;
            log::debug!("Friction {}", if self.friction_enabled { "on" } else { "off" });
        }

        let acceleration = self.acceleration(&input.directions);
        if self.friction_enabled {
            self.ball.color = COLOR_FRICTION;
            self.ball.integrate_with_friction(acceleration, dt);
        } else {
            self.ball.color = COLOR_NO_FRICTION;
            self.ball.integrate(acceleration, dt);
        }

        self.last_contact = wall_bounce(&mut self.ball, self.bounds);
        if self.last_contact.any() {
            log::trace!("Wall contact {:?}, velocity {}", self.last_contact, self.ball.vel);
        }
    }

    fn clear_one_shots(input: &mut BounceInput) {
        input.toggle_friction = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn sim() -> BounceSim {
        BounceSim::new(&BounceSettings::default())
    }

    fn pushing_right() -> BounceInput {
        BounceInput {
            directions: Directions {
                right: true,
                ..Default::default()
            },
            toggle_friction: false,
        }
    }

    #[test]
    fn test_starts_centered_at_rest() {
        let sim = sim();
        assert_eq!(sim.ball.pos, Vec2::new(750.0, 450.0));
        assert_eq!(sim.ball.vel, Vec2::ZERO);
        assert!(!sim.friction_enabled);
    }

    #[test]
    fn test_idle_ball_stays_put() {
        let mut sim = sim();
        for _ in 0..1000 {
            sim.tick(&BounceInput::default(), SIM_DT);
        }
        assert_eq!(sim.ball.pos, Vec2::new(750.0, 450.0));
    }

    #[test]
    fn test_force_accelerates() {
        let mut sim = sim();
        sim.tick(&pushing_right(), 1.0);
        // 10000 / 1000 = 10 px/s²
        assert!((sim.ball.vel.x - 10.0).abs() < 1e-4);
        assert!((sim.ball.pos.x - 755.0).abs() < 1e-3);
    }

    #[test]
    fn test_inelastic_wall_stops_ball() {
        let mut sim = sim();
        sim.ball.vel = Vec2::new(5000.0, 0.0);
        sim.tick(&BounceInput::default(), 0.2);
        assert!(sim.last_contact.right);
        assert_eq!(sim.ball.pos.x, 1500.0 - 30.0);
        assert_eq!(sim.ball.vel.x, 0.0);
    }

    #[test]
    fn test_elastic_wall_reflects() {
        let mut settings = BounceSettings::default();
        settings.material.elasticity = 1.0;
        let mut sim = BounceSim::new(&settings);
        sim.ball.vel = Vec2::new(0.0, -5000.0);
        sim.tick(&BounceInput::default(), 0.2);
        assert!(sim.last_contact.top);
        assert_eq!(sim.ball.vel.y, 5000.0);
    }

    #[test]
    fn test_friction_toggle_slows_ball() {
        let mut sim = sim();
        sim.ball.vel = Vec2::new(1.0, 0.0);
        let toggle = BounceInput {
            toggle_friction: true,
            ..Default::default()
        };
        sim.tick(&toggle, 1.0);
        assert!(sim.friction_enabled);
        assert_eq!(sim.ball.color, COLOR_FRICTION);
        assert!((sim.ball.vel.x - 0.95).abs() < 1e-5);

        sim.tick(&toggle, 1.0);
        assert!(!sim.friction_enabled);
        assert_eq!(sim.ball.color, COLOR_NO_FRICTION);
    }
}
