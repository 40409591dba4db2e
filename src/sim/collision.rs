//! Collision detection and wall response for circles in a rectangular world
//!
//! All tests are discrete, evaluated once per tick after integration. A fast
//! ball can tunnel through a thin rectangle between ticks.

use glam::Vec2;

use super::entity::Ball;

/// Simulation world extent: `[0, width] × [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Point on or inside the rectangle nearest to `point`
    #[inline]
    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.pos += offset;
    }
}

/// Which walls a bounce touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Circle vs axis-aligned rectangle.
///
/// Clamp the centre to the rectangle on each axis to find the nearest point,
/// then compare its distance to the radius. Covers corner, edge and
/// containment cases in one formula: collision iff distance ≤ radius.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = rect.nearest_point(center);
    center.distance(nearest) <= radius
}

/// Whole disc lies inside `bounds`
#[inline]
pub fn in_bounds(center: Vec2, radius: f32, bounds: Bounds) -> bool {
    center.x - radius >= 0.0
        && center.x + radius <= bounds.width
        && center.y - radius >= 0.0
        && center.y + radius <= bounds.height
}

/// Clamp a ball back inside `bounds`, reflecting the velocity component
/// perpendicular to each touched wall scaled by the ball's elasticity.
pub fn wall_bounce(ball: &mut Ball, bounds: Bounds) -> WallContact {
    let r = ball.radius;
    let e = ball.material.elasticity;
    let mut contact = WallContact::default();

    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.vel.x *= -e;
        contact.left = true;
    }
    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y *= -e;
        contact.top = true;
    }
    if ball.pos.x + r > bounds.width {
        ball.pos.x = bounds.width - r;
        ball.vel.x *= -e;
        contact.right = true;
    }
    if ball.pos.y + r > bounds.height {
        ball.pos.y = bounds.height - r;
        ball.vel.y *= -e;
        contact.bottom = true;
    }

    contact
}
