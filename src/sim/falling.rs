//! Dodge the falling balls
//!
//! A paddle slides along the bottom of the window. Balls spawn from the pool
//! at a fixed period and fall; each one that leaves the world scores points,
//! each one that touches the paddle costs a health point. The game freezes
//! once health reaches zero.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{Periodic, Simulation};
use super::collision::{Bounds, Rect};
use super::entity::Rgb;
use super::pool::{BallPool, PoolError};
use crate::consts::{EXIT_SCORE, PADDLE_MARGIN};
use crate::input::Directions;
use crate::settings::FallingSettings;

/// Input for one falling-demo tick
#[derive(Debug, Clone, Default)]
pub struct FallingInput {
    pub directions: Directions,
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub rect: Rect,
    pub speed: f32,
    pub color: Rgb,
}

impl Paddle {
    /// Slide horizontally, staying inside the window
    pub fn slide(&mut self, direction: f32, dt: f32, bounds: Bounds) {
        let max_x = (bounds.width - self.rect.size.x).max(0.0);
        self.rect.pos.x = (self.rect.pos.x + direction * self.speed * dt).clamp(0.0, max_x);
    }
}

/// Complete state of the falling demo
#[derive(Debug, Clone)]
pub struct FallingGame {
    pub bounds: Bounds,
    pub paddle: Paddle,
    pub pool: BallPool,
    pub health: i32,
    pub score: u32,
    spawner: Periodic,
    rng: Pcg32,
}

impl FallingGame {
    pub fn new(settings: &FallingSettings, seed: u64) -> Result<Self, PoolError> {
        let bounds = Bounds::new(settings.window_width as f32, settings.window_height as f32);
        let size = Vec2::new(settings.paddle.width, settings.paddle.height);
        let paddle = Paddle {
            rect: Rect::new(
                Vec2::new(
                    bounds.width / 2.0 - size.x / 2.0,
                    bounds.height - size.y - PADDLE_MARGIN,
                ),
                size,
            ),
            speed: settings.paddle.speed,
            color: settings.paddle.color,
        };
        let pool = BallPool::new(
            settings.balls.pool_size,
            bounds,
            settings.balls.radius,
            settings.balls.color,
            Vec2::ZERO,
        )?;

        Ok(Self {
            bounds,
            paddle,
            pool,
            health: settings.paddle.health_points,
            score: 0,
            spawner: Periodic::new(settings.balls.spawn_period),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn is_over(&self) -> bool {
        self.health <= 0
    }

    /// Advance the spawn timer by a frame's wall time. Each elapsed period
    /// spawns one ball while the game is live, and is consumed either way.
    pub fn advance_spawner(&mut self, frame_delta: f32) -> u32 {
        let due = self.spawner.advance(frame_delta);
        if self.is_over() {
            return 0;
        }
        let mut spawned = 0;
        for _ in 0..due {
            if self.pool.spawn_falling(&mut self.rng).is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// HUD text shown over the playfield
    pub fn status_text(&self) -> String {
        format!(
            "HP: {}\nScore: {}\nAvoid the falling balls!",
            self.health, self.score
        )
    }
}

impl Simulation for FallingGame {
    type Input = FallingInput;

    fn is_live(&self) -> bool {
        !self.is_over()
    }

    fn tick(&mut self, input: &FallingInput, dt: f32) {
        self.paddle
            .slide(input.directions.horizontal(), dt, self.bounds);

        let exited = self.pool.update_all(dt, Vec2::ZERO);
        self.score += exited * EXIT_SCORE;

        let hits = self.pool.recycle_colliding(&self.paddle.rect);
        if hits > 0 {
            self.health = (self.health - hits as i32).max(0);
            log::debug!("Paddle hit by {} ball(s), HP {}", hits, self.health);
            if self.is_over() {
                log::info!("Out of health. Final score: {}", self.score);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::clock::FixedTimestep;

    fn game() -> FallingGame {
        let mut settings = FallingSettings::default();
        settings.window_width = 400;
        settings.window_height = 300;
        settings.balls.pool_size = 3;
        FallingGame::new(&settings, 42).unwrap()
    }

    #[test]
    fn test_paddle_starts_centered() {
        let game = game();
        assert_eq!(game.paddle.rect.pos, Vec2::new(150.0, 255.0));
        assert_eq!(game.health, 10);
    }

    #[test]
    fn test_paddle_stays_in_window() {
        let mut game = game();
        let input = FallingInput {
            directions: Directions {
                left: true,
                ..Default::default()
            },
        };
        for _ in 0..1000 {
            game.tick(&input, SIM_DT);
        }
        assert_eq!(game.paddle.rect.pos.x, 0.0);
    }

    #[test]
    fn test_exit_scores() {
        let mut game = game();
        // Away from the paddle, heading out the top
        game.pool.spawn(Vec2::new(40.0, 40.0), Vec2::new(0.0, -1000.0));
        game.tick(&FallingInput::default(), 0.1);
        assert_eq!(game.score, EXIT_SCORE);
        assert_eq!(game.pool.active_count(), 0);
    }

    #[test]
    fn test_paddle_hit_costs_health() {
        let mut game = game();
        let target = game.paddle.rect.pos + Vec2::new(50.0, -5.0);
        game.pool.spawn(target, Vec2::ZERO);
        game.pool.spawn(target, Vec2::ZERO);
        game.tick(&FallingInput::default(), SIM_DT);
        assert_eq!(game.health, 8);
        assert_eq!(game.pool.active_count(), 0);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_health_never_negative() {
        let mut game = game();
        game.health = 1;
        let target = game.paddle.rect.pos + Vec2::new(50.0, -5.0);
        for _ in 0..3 {
            game.pool.spawn(target, Vec2::ZERO);
        }
        game.tick(&FallingInput::default(), SIM_DT);
        assert_eq!(game.health, 0);
        assert!(game.is_over());
    }

    #[test]
    fn test_spawner_respects_capacity_and_liveness() {
        let mut game = game();
        assert_eq!(game.advance_spawner(1.0), 3);
        assert_eq!(game.pool.active_count(), 3);

        for slot in 0..game.pool.capacity() {
            game.pool.recycle(slot);
        }
        game.health = 0;
        assert_eq!(game.advance_spawner(1.0), 0);
        assert_eq!(game.pool.active_count(), 0);
    }

    #[test]
    fn test_game_over_does_not_stall_driver() {
        let mut game = game();
        game.health = 0;
        let mut step = FixedTimestep::new(SIM_DT);
        let drained = step.advance(0.505, &mut game, &mut FallingInput::default());
        assert_eq!(drained, 72);
        assert!(step.accumulator() < SIM_DT);
    }

    #[test]
    fn test_status_text() {
        let game = game();
        assert_eq!(game.status_text(), "HP: 10\nScore: 0\nAvoid the falling balls!");
    }
}
