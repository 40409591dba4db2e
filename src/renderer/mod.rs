//! CPU-side rendering module
//!
//! Turns simulation state into `Vertex` triangle lists ready for upload.

pub mod shapes;
pub mod vertex;

pub use shapes::{circle, draw_blink, draw_bounce, draw_falling, draw_shapes, rect};
pub use vertex::Vertex;
