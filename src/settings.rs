//! Demo settings
//!
//! One JSON file per demo with named fields. Missing fields take their
//! defaults; a missing file means all defaults. A file that fails to parse
//! or validate is reported as a single error.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::entity::{Material, Rgb};

/// Settings loading failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Shared behaviour of every demo's settings struct
pub trait DemoSettings: Default + DeserializeOwned + Serialize {
    /// File looked up when no explicit path is given
    const FILE_NAME: &'static str;

    /// Reject values the simulation cannot run with
    fn validate(&self) -> Result<(), SettingsError>;

    /// Parse and validate settings from a JSON string
    fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("{} successfully loaded.", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{} not loaded. Using default values.", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load, falling back to defaults (with a warning) on any error
    fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{}: {}. Using default values.", path.display(), e);
            Self::default()
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(field, format!("must not be negative, got {value}")))
    }
}

fn window(width: u32, height: u32) -> Result<(), SettingsError> {
    if width == 0 {
        return Err(SettingsError::invalid("window_width", "must be non-zero"));
    }
    if height == 0 {
        return Err(SettingsError::invalid("window_height", "must be non-zero"));
    }
    Ok(())
}

/// Player paddle for the falling demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed in pixels/s
    pub speed: f32,
    pub health_points: i32,
    pub color: Rgb,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            health_points: PADDLE_HEALTH,
            color: Rgb::WHITE,
        }
    }
}

/// Falling balls for the falling demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingBallSettings {
    pub radius: f32,
    pub color: Rgb,
    /// Seconds between spawns
    pub spawn_period: f32,
    pub pool_size: usize,
}

impl Default for FallingBallSettings {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            color: Rgb::RED,
            spawn_period: BALL_SPAWN_PERIOD,
            pool_size: BALL_POOL_SIZE,
        }
    }
}

/// Dodge-the-falling-balls settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingSettings {
    pub window_width: u32,
    pub window_height: u32,
    pub paddle: PaddleSettings,
    pub balls: FallingBallSettings,
    /// RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for FallingSettings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH as u32,
            window_height: WINDOW_HEIGHT as u32,
            paddle: PaddleSettings::default(),
            balls: FallingBallSettings::default(),
            seed: None,
        }
    }
}

impl DemoSettings for FallingSettings {
    const FILE_NAME: &'static str = "falling_settings.json";

    fn validate(&self) -> Result<(), SettingsError> {
        window(self.window_width, self.window_height)?;
        positive("paddle.width", self.paddle.width)?;
        positive("paddle.height", self.paddle.height)?;
        non_negative("paddle.speed", self.paddle.speed)?;
        if self.paddle.health_points < 0 {
            return Err(SettingsError::invalid("paddle.health_points", "must not be negative"));
        }
        if self.paddle.width > self.window_width as f32 {
            return Err(SettingsError::invalid("paddle.width", "wider than the window"));
        }
        positive("balls.radius", self.balls.radius)?;
        positive("balls.spawn_period", self.balls.spawn_period)?;
        if self.balls.pool_size == 0 {
            return Err(SettingsError::invalid("balls.pool_size", "must be non-zero"));
        }
        Ok(())
    }
}

/// Force-driven bouncing ball settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceSettings {
    pub window_width: u32,
    pub window_height: u32,
    /// Push applied while a direction is held
    pub force: f32,
    pub material: Material,
    pub radius: f32,
}

impl Default for BounceSettings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH as u32,
            window_height: WINDOW_HEIGHT as u32,
            force: 10_000.0,
            material: Material {
                mass: 1000.0,
                elasticity: 0.0,
                friction: 0.05,
            },
            radius: 30.0,
        }
    }
}

impl DemoSettings for BounceSettings {
    const FILE_NAME: &'static str = "bounce_settings.json";

    fn validate(&self) -> Result<(), SettingsError> {
        window(self.window_width, self.window_height)?;
        non_negative("force", self.force)?;
        positive("material.mass", self.material.mass)?;
        if !(0.0..=1.0).contains(&self.material.elasticity) {
            return Err(SettingsError::invalid(
                "material.elasticity",
                format!("must be within [0, 1], got {}", self.material.elasticity),
            ));
        }
        non_negative("material.friction", self.material.friction)?;
        positive("radius", self.radius)?;
        let smallest = self.window_width.min(self.window_height) as f32;
        if 2.0 * self.radius > smallest {
            return Err(SettingsError::invalid("radius", "too large for the window"));
        }
        Ok(())
    }
}

/// Drifting shapes field settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapesSettings {
    pub window_width: u32,
    pub window_height: u32,
    pub circle_count: usize,
    pub square_count: usize,
    pub circle_radius: f32,
    pub square_size: f32,
    /// Drift speed of the uncontrolled shapes
    pub drift_speed: f32,
    /// Speed of the key-steered first circle
    pub circle_speed: f32,
    /// Speed of the pointer-chasing first square
    pub square_speed: f32,
    pub seed: Option<u64>,
}

impl Default for ShapesSettings {
    fn default() -> Self {
        Self {
            window_width: 850,
            window_height: 500,
            circle_count: 60,
            square_count: 40,
            circle_radius: 30.0,
            square_size: 50.0,
            drift_speed: 20.0,
            circle_speed: 200.0,
            square_speed: 200.0,
            seed: None,
        }
    }
}

impl DemoSettings for ShapesSettings {
    const FILE_NAME: &'static str = "shapes_settings.json";

    fn validate(&self) -> Result<(), SettingsError> {
        window(self.window_width, self.window_height)?;
        positive("circle_radius", self.circle_radius)?;
        positive("square_size", self.square_size)?;
        non_negative("drift_speed", self.drift_speed)?;
        non_negative("circle_speed", self.circle_speed)?;
        non_negative("square_speed", self.square_speed)?;
        Ok(())
    }
}

/// Music and SFX mixer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerSettings {
    pub music_volume: f32,
    pub music_pitch: f32,
    pub sfx_volume: f32,
    pub sfx_pitch: f32,
    /// Music clip length in seconds at pitch 1.0
    pub music_length: f32,
    /// SFX clip length in seconds at pitch 1.0
    pub sfx_length: f32,
    pub voice_count: usize,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            music_volume: 50.0,
            music_pitch: 1.0,
            sfx_volume: 50.0,
            sfx_pitch: 1.0,
            music_length: 120.0,
            sfx_length: 0.5,
            voice_count: VOICE_POOL_SIZE,
        }
    }
}

impl DemoSettings for MixerSettings {
    const FILE_NAME: &'static str = "mixer_settings.json";

    fn validate(&self) -> Result<(), SettingsError> {
        for (field, volume) in [("music_volume", self.music_volume), ("sfx_volume", self.sfx_volume)] {
            if !(0.0..=100.0).contains(&volume) {
                return Err(SettingsError::invalid(field, format!("must be within [0, 100], got {volume}")));
            }
        }
        positive("music_pitch", self.music_pitch)?;
        positive("sfx_pitch", self.sfx_pitch)?;
        positive("music_length", self.music_length)?;
        positive("sfx_length", self.sfx_length)?;
        if self.voice_count == 0 {
            return Err(SettingsError::invalid("voice_count", "must be non-zero"));
        }
        Ok(())
    }
}

/// Colour-cycling shape settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkSettings {
    /// Seconds between colour changes
    pub period: f32,
    pub radius: f32,
    pub seed: Option<u64>,
}

impl Default for BlinkSettings {
    fn default() -> Self {
        Self {
            period: 1.0,
            radius: 100.0,
            seed: None,
        }
    }
}

impl DemoSettings for BlinkSettings {
    const FILE_NAME: &'static str = "blink_settings.json";

    fn validate(&self) -> Result<(), SettingsError> {
        positive("period", self.period)?;
        positive("radius", self.radius)
    }
}

/// Grid game board settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub rows: u32,
    pub columns: u32,
    /// Player position as (row, column)
    pub player: (i32, i32),
    /// Target position as (row, column)
    pub target: (i32, i32),
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 3,
            player: (2, 2),
            target: (1, 1),
        }
    }
}

impl DemoSettings for GridSettings {
    const FILE_NAME: &'static str = "grid_settings.json";

    fn validate(&self) -> Result<(), SettingsError> {
        if self.rows == 0 {
            return Err(SettingsError::invalid("rows", "must be non-zero"));
        }
        if self.columns == 0 {
            return Err(SettingsError::invalid("columns", "must be non-zero"));
        }
        let fits = |(r, c): (i32, i32)| {
            r >= 0 && c >= 0 && (r as u32) < self.rows && (c as u32) < self.columns
        };
        if !fits(self.player) {
            return Err(SettingsError::invalid("player", "outside the grid"));
        }
        if !fits(self.target) {
            return Err(SettingsError::invalid("target", "outside the grid"));
        }
        Ok(())
    }
}
