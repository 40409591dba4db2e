//! Ballpit - fixed-timestep ball simulations
//!
//! Core modules:
//! - `sim`: Fixed-timestep driver, ball pool, collisions and demo contexts
//! - `renderer`: CPU-side geometry generated from simulation state
//! - `input`: Per-tick input snapshots
//! - `settings`: Named, validated per-demo configuration
//! - `grid`: Text-based grid "attack the target" game

pub mod grid;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use input::Directions;
pub use settings::SettingsError;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (144 Hz)
    pub const SIM_DT: f32 = 1.0 / 144.0;
    /// Render frame cap for the headless runner
    pub const FPS_LIMIT: u32 = 60;
    /// Speeds below this snap to zero
    pub const EPSILON: f32 = 1e-6;

    /// Window defaults for the falling and bounce demos
    pub const WINDOW_WIDTH: f32 = 1500.0;
    pub const WINDOW_HEIGHT: f32 = 900.0;

    /// Ball pool capacity for the falling demo
    pub const BALL_POOL_SIZE: usize = 200;
    /// SFX voice pool capacity for the mixer demo
    pub const VOICE_POOL_SIZE: usize = 200;

    /// Falling ball defaults
    pub const BALL_RADIUS: f32 = 30.0;
    pub const BALL_SPAWN_PERIOD: f32 = 0.25;
    pub const BALL_MIN_FALL_SPEED: f32 = 100.0;
    pub const BALL_MAX_FALL_SPEED: f32 = 1000.0;
    /// Points awarded for each ball that leaves the world
    pub const EXIT_SCORE: u32 = 10;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 30.0;
    pub const PADDLE_SPEED: f32 = 300.0;
    /// Gap between paddle bottom and window bottom
    pub const PADDLE_MARGIN: f32 = 15.0;
    pub const PADDLE_HEALTH: i32 = 10;
}

/// Euclidean length, snapped to zero below `consts::EPSILON`
#[inline]
pub fn snapped_length(v: glam::Vec2) -> f32 {
    let len = v.length();
    if len > consts::EPSILON { len } else { 0.0 }
}
