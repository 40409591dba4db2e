//! Shape generation for 2D primitives
//!
//! Everything here reads simulation state and returns triangle lists. Nothing
//! writes back into the simulation.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::shapes::ShapesField;
use crate::sim::{Blink, BounceSim, FallingGame, Rect};

/// Segments used for every circle
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = rect.min();
    let max = rect.max();
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Active balls then the paddle
pub fn draw_falling(game: &FallingGame) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for (_, ball) in game.pool.iter_active() {
        vertices.extend(circle(ball.pos, ball.radius, ball.color.to_rgba(), CIRCLE_SEGMENTS));
    }
    vertices.extend(rect(&game.paddle.rect, game.paddle.color.to_rgba()));
    vertices
}

pub fn draw_bounce(sim: &BounceSim) -> Vec<Vertex> {
    let ball = &sim.ball;
    circle(ball.pos, ball.radius, ball.color.to_rgba(), CIRCLE_SEGMENTS)
}

/// Squares first so circles draw on top
pub fn draw_shapes(field: &ShapesField) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for square in &field.squares {
        vertices.extend(rect(&square.rect, square.color.to_rgba()));
    }
    for c in &field.circles {
        vertices.extend(circle(c.center(), c.radius, c.color.to_rgba(), CIRCLE_SEGMENTS));
    }
    vertices
}

pub fn draw_blink(blink: &Blink, center: Vec2) -> Vec<Vertex> {
    circle(center, blink.radius, blink.color().to_rgba(), CIRCLE_SEGMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{BlinkSettings, BounceSettings, FallingSettings};
    use crate::sim::Simulation;

    const VERTS_PER_CIRCLE: usize = CIRCLE_SEGMENTS as usize * 3;

    #[test]
    fn test_circle_vertices_on_rim() {
        let vertices = circle(Vec2::new(10.0, 20.0), 5.0, [1.0; 4], 8);
        assert_eq!(vertices.len(), 24);
        for tri in vertices.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 20.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position) - Vec2::new(10.0, 20.0);
                assert!((d.length() - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_rect_corners() {
        let r = Rect::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let vertices = rect(&r, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position, [1.0, 2.0]);
        assert_eq!(vertices[5].position, [4.0, 6.0]);
    }

    #[test]
    fn test_falling_skips_inactive_slots() {
        let mut game = FallingGame::new(&FallingSettings::default(), 5).unwrap();
        assert_eq!(draw_falling(&game).len(), 6);

        game.advance_spawner(0.6);
        assert_eq!(game.pool.active_count(), 2);
        assert_eq!(draw_falling(&game).len(), 2 * VERTS_PER_CIRCLE + 6);
    }

    #[test]
    fn test_bounce_color_follows_friction() {
        let mut sim = BounceSim::new(&BounceSettings::default());
        let before = draw_bounce(&sim);
        assert_eq!(before.len(), VERTS_PER_CIRCLE);

        let input = crate::sim::BounceInput {
            toggle_friction: true,
            ..Default::default()
        };
        sim.tick(&input, 0.01);
        let after = draw_bounce(&sim);
        assert_ne!(before[0].color, after[0].color);
    }

    #[test]
    fn test_blink_uses_current_color() {
        let blink = Blink::new(&BlinkSettings::default(), 2);
        let vertices = draw_blink(&blink, Vec2::new(100.0, 100.0));
        assert_eq!(vertices[0].color, blink.color().to_rgba());
    }
}
