//! Fixed-timestep simulation module
//!
//! All demo logic lives here. This module stays free of rendering and
//! platform concerns:
//! - Fixed timestep only, driven by `clock::FixedTimestep`
//! - Seeded RNG only
//! - Entity pools sized once at construction

pub mod blink;
pub mod bounce;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod falling;
pub mod mixer;
pub mod pool;
pub mod shapes;

pub use blink::Blink;
pub use bounce::{BounceInput, BounceSim};
pub use clock::{FixedTimestep, FrameClock, Periodic, Simulation};
pub use collision::{Bounds, Rect, WallContact, circle_rect_collision, in_bounds, wall_bounce};
pub use entity::{Ball, Material, Rgb};
pub use falling::{FallingGame, FallingInput};
pub use mixer::{Mixer, MixerInput};
pub use pool::{BallPool, PoolError};
pub use shapes::{ShapesField, ShapesInput};
