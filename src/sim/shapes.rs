//! Field of drifting circles and squares
//!
//! Every circle but the first drifts down, every square but the first drifts
//! right. The first circle is steered by the held directions; the first
//! square chases the pointer while its button is held.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::Simulation;
use super::collision::{Bounds, Rect};
use super::entity::Rgb;
use crate::consts::EPSILON;
use crate::input::Directions;
use crate::settings::ShapesSettings;

/// Palette cycled across generated shapes
pub const PALETTE: [Rgb; 6] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::YELLOW, Rgb::CYAN, Rgb::WHITE];

/// Input for one shapes-demo tick
#[derive(Debug, Clone, Default)]
pub struct ShapesInput {
    pub directions: Directions,
    /// Pointer position while the button is held
    pub pointer: Option<Vec2>,
}

/// Circle drawn from its top-left bounding-box corner
#[derive(Debug, Clone)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

impl Circle {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }
}

#[derive(Debug, Clone)]
pub struct Square {
    pub rect: Rect,
    pub color: Rgb,
}

/// Complete state of the shapes demo
#[derive(Debug, Clone)]
pub struct ShapesField {
    pub bounds: Bounds,
    pub circles: Vec<Circle>,
    pub squares: Vec<Square>,
    pub drift_speed: f32,
    pub circle_speed: f32,
    pub square_speed: f32,
}

impl ShapesField {
    /// Scatter shapes at seeded random positions
    pub fn new(settings: &ShapesSettings, seed: u64) -> Self {
        let bounds = Bounds::new(settings.window_width as f32, settings.window_height as f32);
        let mut rng = Pcg32::seed_from_u64(seed);
        let max_x = settings.window_width.saturating_sub(1);
        let max_y = settings.window_height.saturating_sub(1);

        let squares = (0..settings.square_count)
            .map(|i| Square {
                rect: Rect::new(
                    Vec2::new(
                        rng.random_range(0..=max_x) as f32,
                        rng.random_range(0..=max_y) as f32,
                    ),
                    Vec2::splat(settings.square_size),
                ),
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();

        let circles = (0..settings.circle_count)
            .map(|i| Circle {
                pos: Vec2::new(
                    rng.random_range(0..=max_x) as f32,
                    rng.random_range(0..=max_y) as f32,
                ),
                radius: settings.circle_radius,
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();

        Self {
            bounds,
            circles,
            squares,
            drift_speed: settings.drift_speed,
            circle_speed: settings.circle_speed,
            square_speed: settings.square_speed,
        }
    }

    /// Move the first square toward `target` by at most `square_speed·dt`
    fn chase(&mut self, target: Vec2, dt: f32) {
        let Some(square) = self.squares.first_mut() else {
            return;
        };
        let diff = target - square.rect.pos;
        let distance = diff.length();
        let step = distance.min(self.square_speed * dt);
        if step > EPSILON {
            square.rect.translate(diff / distance * step);
        }
    }
}

impl Simulation for ShapesField {
    type Input = ShapesInput;

    fn tick(&mut self, input: &ShapesInput, dt: f32) {
        let drift = self.drift_speed * dt;
        for square in self.squares.iter_mut().skip(1) {
            square.rect.translate(Vec2::new(drift, 0.0));
        }
        for circle in self.circles.iter_mut().skip(1) {
            circle.pos.y += drift;
        }

        if let Some(first) = self.circles.first_mut() {
            first.pos += input.directions.unit() * self.circle_speed * dt;
        }

        if let Some(target) = input.pointer {
            self.chase(target, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ShapesField {
        let settings = ShapesSettings {
            circle_count: 3,
            square_count: 2,
            ..Default::default()
        };
        ShapesField::new(&settings, 1)
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = field();
        let b = field();
        assert_eq!(a.circles.len(), 3);
        assert_eq!(a.squares.len(), 2);
        assert_eq!(a.circles[2].pos, b.circles[2].pos);
        assert_eq!(a.squares[1].color, PALETTE[1]);
        for circle in &a.circles {
            assert!(circle.pos.x < 850.0 && circle.pos.y < 500.0);
        }
    }

    #[test]
    fn test_drift_skips_first_shapes() {
        let mut field = field();
        let first_circle = field.circles[0].pos;
        let first_square = field.squares[0].rect.pos;
        let second_circle = field.circles[1].pos;
        let second_square = field.squares[1].rect.pos;

        field.tick(&ShapesInput::default(), 0.5);

        assert_eq!(field.circles[0].pos, first_circle);
        assert_eq!(field.squares[0].rect.pos, first_square);
        assert!((field.circles[1].pos.y - (second_circle.y + 10.0)).abs() < 1e-4);
        assert!((field.squares[1].rect.pos.x - (second_square.x + 10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_first_circle_steers() {
        let mut field = field();
        let start = field.circles[0].pos;
        let input = ShapesInput {
            directions: Directions {
                down: true,
                ..Default::default()
            },
            pointer: None,
        };
        field.tick(&input, 0.1);
        assert!((field.circles[0].pos - (start + Vec2::new(0.0, 20.0))).length() < 1e-4);
    }

    #[test]
    fn test_square_chase_does_not_overshoot() {
        let mut field = field();
        let start = field.squares[0].rect.pos;
        let target = start + Vec2::new(3.0, 4.0);
        let input = ShapesInput {
            pointer: Some(target),
            ..Default::default()
        };
        field.tick(&input, 1.0);
        assert!((field.squares[0].rect.pos - target).length() < 1e-3);

        // Far target: capped at square_speed·dt
        let far = field.squares[0].rect.pos + Vec2::new(1000.0, 0.0);
        let before = field.squares[0].rect.pos;
        let input = ShapesInput {
            pointer: Some(far),
            ..Default::default()
        };
        field.tick(&input, 0.1);
        assert!((field.squares[0].rect.pos.x - before.x - 20.0).abs() < 1e-3);
    }
}
