//! Per-tick input snapshots
//!
//! Translating raw keyboard or mouse events into these flags belongs to the
//! windowing layer. The simulation only sees the snapshot.

use glam::Vec2;

/// Currently held direction keys (W/A/S/D style)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    /// Unnormalised direction in screen space (y grows downward)
    pub fn vector(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }

    /// Unit direction, or zero when nothing is held or opposite keys cancel
    pub fn unit(&self) -> Vec2 {
        let dir = self.vector();
        if crate::snapped_length(dir) > 0.0 {
            dir.normalize()
        } else {
            Vec2::ZERO
        }
    }

    /// Horizontal axis only: -1, 0 or 1
    pub fn horizontal(&self) -> f32 {
        self.vector().x
    }
}
