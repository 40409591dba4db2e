//! Fixed-capacity ball pool
//!
//! Slots are allocated once at construction and never added or freed.
//! Spawning reuses the first inactive slot; recycling parks a slot outside
//! the world at `(-radius, -radius)` and marks it inactive.

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use super::collision::{Bounds, Rect, circle_rect_collision, in_bounds};
use super::entity::{Ball, Rgb};
use crate::consts::{BALL_MAX_FALL_SPEED, BALL_MIN_FALL_SPEED};

/// Pool construction failures
#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("ball radius {radius} is too large for a {width}x{height} world")]
    RadiusTooLarge { radius: f32, width: f32, height: f32 },
    #[error("pool capacity must be non-zero")]
    ZeroCapacity,
}

/// One pool slot: a ball plus its active tag
#[derive(Debug, Clone)]
pub struct Slot {
    pub ball: Ball,
    pub active: bool,
}

/// Fixed-capacity arena of reusable ball slots
#[derive(Debug, Clone)]
pub struct BallPool {
    slots: Box<[Slot]>,
    bounds: Bounds,
}

impl BallPool {
    /// Allocate `capacity` parked slots sharing one radius, colour and
    /// starting velocity.
    pub fn new(
        capacity: usize,
        bounds: Bounds,
        radius: f32,
        color: Rgb,
        velocity: Vec2,
    ) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        if 2.0 * radius > bounds.width || 2.0 * radius > bounds.height {
            return Err(PoolError::RadiusTooLarge {
                radius,
                width: bounds.width,
                height: bounds.height,
            });
        }

        let slots = (0..capacity)
            .map(|_| {
                let mut ball = Ball::new(Self::parked_position(radius), radius);
                ball.color = color;
                ball.vel = velocity;
                Slot {
                    ball,
                    active: false,
                }
            })
            .collect();

        log::debug!(
            "Ball pool ready: {} slots, radius {}, world {}x{}",
            capacity,
            radius,
            bounds.width,
            bounds.height
        );

        Ok(Self { slots, bounds })
    }

    #[inline]
    fn parked_position(radius: f32) -> Vec2 {
        Vec2::splat(-radius)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn is_active(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.active)
    }

    pub fn get(&self, slot: usize) -> Option<&Ball> {
        self.slots.get(slot).map(|s| &s.ball)
    }

    /// Active slots with their indices, in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Ball)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (i, &s.ball))
    }

    /// Reinitialise the first inactive slot. Returns its index, or `None`
    /// when every slot is in use (no growth, no error) or when the ball would
    /// not lie wholly inside the world.
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2) -> Option<usize> {
        let bounds = self.bounds;
        let (index, slot) = self.slots.iter_mut().enumerate().find(|(_, s)| !s.active)?;
        if !in_bounds(pos, slot.ball.radius, bounds) {
            log::debug!("Rejected spawn outside the world at {pos}");
            return None;
        }
        slot.ball.pos = pos;
        slot.ball.vel = vel;
        slot.active = true;
        Some(index)
    }

    /// Spawn at a random x along the top edge, falling at a random speed
    pub fn spawn_falling<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let radius = self.slots.iter().find(|s| !s.active)?.ball.radius;
        let width = self.bounds.width;

        let x = (rng.random_range(0.0..=width)).clamp(radius, width - radius);
        let speed = rng.random_range(BALL_MIN_FALL_SPEED..BALL_MAX_FALL_SPEED);
        self.spawn(Vec2::new(x, radius), Vec2::new(0.0, speed))
    }

    /// Park a slot outside the world and mark it inactive
    pub fn recycle(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            s.ball.pos = Self::parked_position(s.ball.radius);
            s.active = false;
        }
    }

    /// Integrate every active slot under `acceleration`.
    ///
    /// A ball that crosses out of the world during this step is recycled.
    /// Returns how many crossed: only balls that were inside before the step
    /// count.
    pub fn update_all(&mut self, dt: f32, acceleration: Vec2) -> u32 {
        let bounds = self.bounds;
        let mut exited = 0;
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            let was_in = slot.ball.is_in_bounds(bounds);
            slot.ball.integrate(acceleration, dt);
            if !slot.ball.is_in_bounds(bounds) {
                slot.ball.pos = Self::parked_position(slot.ball.radius);
                slot.active = false;
                if was_in {
                    exited += 1;
                }
            }
        }
        exited
    }

    /// Indices of active slots whose circle touches `rect`
    pub fn query_collisions<'a>(&'a self, rect: &'a Rect) -> impl Iterator<Item = usize> + 'a {
        self.iter_active()
            .filter(move |(_, ball)| circle_rect_collision(ball.pos, ball.radius, rect))
            .map(|(i, _)| i)
    }

    /// Recycle every active slot touching `rect`. Returns how many.
    pub fn recycle_colliding(&mut self, rect: &Rect) -> u32 {
        let hits: Vec<usize> = self.query_collisions(rect).collect();
        for &slot in &hits {
            self.recycle(slot);
        }
        hits.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pool(capacity: usize) -> BallPool {
        BallPool::new(capacity, Bounds::new(400.0, 300.0), 10.0, Rgb::RED, Vec2::ZERO).unwrap()
    }

    #[test]
    fn test_new_pool_is_parked() {
        let pool = pool(5);
        assert_eq!(pool.capacity(), 5);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.get(0).unwrap().pos, Vec2::splat(-10.0));
        assert!(!pool.get(0).unwrap().is_in_bounds(pool.bounds()));
    }

    #[test]
    fn test_radius_too_large() {
        let err = BallPool::new(3, Bounds::new(50.0, 300.0), 30.0, Rgb::RED, Vec2::ZERO);
        assert!(matches!(err, Err(PoolError::RadiusTooLarge { .. })));
        assert_eq!(
            BallPool::new(0, Bounds::new(50.0, 50.0), 1.0, Rgb::RED, Vec2::ZERO).unwrap_err(),
            PoolError::ZeroCapacity
        );
    }

    #[test]
    fn test_spawn_full_pool_is_noop() {
        let mut pool = pool(3);
        for _ in 0..3 {
            assert!(pool.spawn(Vec2::new(50.0, 50.0), Vec2::ZERO).is_some());
        }
        assert_eq!(pool.spawn(Vec2::new(50.0, 50.0), Vec2::ZERO), None);
        assert_eq!(pool.active_count(), 3);
        assert_eq!(pool.capacity(), 3);
    }

    #[test]
    fn test_spawn_reuses_first_free_slot() {
        let mut pool = pool(3);
        pool.spawn(Vec2::new(50.0, 50.0), Vec2::ZERO);
        pool.spawn(Vec2::new(60.0, 50.0), Vec2::ZERO);
        pool.spawn(Vec2::new(70.0, 50.0), Vec2::ZERO);
        pool.recycle(1);
        assert!(!pool.is_active(1));
        assert!(!pool.get(1).unwrap().is_in_bounds(pool.bounds()));
        assert_eq!(pool.spawn(Vec2::new(80.0, 80.0), Vec2::ZERO), Some(1));
        assert_eq!(pool.get(1).unwrap().pos, Vec2::new(80.0, 80.0));
    }

    #[test]
    fn test_update_recycles_exits() {
        let mut pool = pool(2);
        pool.spawn(Vec2::new(100.0, 285.0), Vec2::new(0.0, 500.0));
        pool.spawn(Vec2::new(100.0, 100.0), Vec2::new(0.0, 10.0));
        let exited = pool.update_all(0.1, Vec2::ZERO);
        assert_eq!(exited, 1);
        assert!(!pool.is_active(0));
        assert!(pool.is_active(1));
        assert!((pool.get(1).unwrap().pos.y - 101.0).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_outside_world_is_rejected() {
        let mut pool = pool(2);
        // Radius 10 straddling the left edge
        assert_eq!(pool.spawn(Vec2::new(5.0, 50.0), Vec2::ZERO), None);
        assert_eq!(pool.spawn(Vec2::new(100.0, 500.0), Vec2::ZERO), None);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.update_all(crate::consts::SIM_DT, Vec2::ZERO), 0);
        assert_eq!(pool.spawn(Vec2::new(10.0, 50.0), Vec2::ZERO), Some(0));
    }

    #[test]
    fn test_exit_counts_only_balls_that_were_inside() {
        let mut pool = pool(2);
        pool.spawn(Vec2::new(100.0, 100.0), Vec2::ZERO);
        pool.spawn(Vec2::new(100.0, 285.0), Vec2::new(0.0, 500.0));
        // Already outside before integrating
        pool.slots[0].ball.pos = Vec2::new(5.0, 50.0);

        assert_eq!(pool.update_all(0.1, Vec2::ZERO), 1);
        assert!(!pool.is_active(0));
        assert!(!pool.is_active(1));
    }

    #[test]
    fn test_inactive_slots_do_not_move() {
        let mut pool = BallPool::new(
            2,
            Bounds::new(400.0, 300.0),
            10.0,
            Rgb::RED,
            Vec2::new(50.0, 50.0),
        )
        .unwrap();
        pool.update_all(1.0, Vec2::new(0.0, 100.0));
        assert_eq!(pool.get(0).unwrap().pos, Vec2::splat(-10.0));
    }

    #[test]
    fn test_collisions_and_recycle() {
        let mut pool = pool(4);
        pool.spawn(Vec2::new(50.0, 50.0), Vec2::ZERO);
        pool.spawn(Vec2::new(200.0, 200.0), Vec2::ZERO);
        pool.spawn(Vec2::new(75.0, 50.0), Vec2::ZERO);
        let paddle = Rect::new(Vec2::new(40.0, 40.0), Vec2::new(40.0, 20.0));

        let hits: Vec<usize> = pool.query_collisions(&paddle).collect();
        assert_eq!(hits, vec![0, 2]);

        assert_eq!(pool.recycle_colliding(&paddle), 2);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.query_collisions(&paddle).count(), 0);
    }

    #[test]
    fn test_parked_slots_never_collide() {
        let pool = pool(2);
        // Rect covering the parking spot
        let rect = Rect::new(Vec2::splat(-50.0), Vec2::splat(60.0));
        assert_eq!(pool.query_collisions(&rect).count(), 0);
    }

    #[test]
    fn test_spawn_falling_fits_world() {
        let mut pool = pool(50);
        let mut rng = Pcg32::seed_from_u64(7);
        while pool.spawn_falling(&mut rng).is_some() {}
        assert_eq!(pool.active_count(), 50);
        for (_, ball) in pool.iter_active() {
            assert!(ball.is_in_bounds(pool.bounds()));
            assert_eq!(ball.pos.y, 10.0);
            assert!(ball.vel.y >= BALL_MIN_FALL_SPEED && ball.vel.y < BALL_MAX_FALL_SPEED);
        }
    }

    proptest! {
        #[test]
        fn capacity_never_changes(ops in prop::collection::vec(0u8..3, 0..200)) {
            let mut pool = pool(8);
            for (i, op) in ops.iter().enumerate() {
                match op {
                    0 => { pool.spawn(Vec2::new(100.0, 100.0), Vec2::new(0.0, 300.0)); }
                    1 => pool.recycle(i % 8),
                    _ => { pool.update_all(crate::consts::SIM_DT * 10.0, Vec2::ZERO); }
                }
                prop_assert_eq!(pool.capacity(), 8);
                prop_assert!(pool.active_count() <= 8);
            }
        }
    }
}
