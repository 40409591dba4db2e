//! Colour-cycling circle
//!
//! Picks a random palette colour once per period. A lag spike replays every
//! missed period.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::{Periodic, Simulation};
use super::entity::Rgb;
use crate::settings::BlinkSettings;

pub const PALETTE: [Rgb; 5] = [Rgb::GREEN, Rgb::BLUE, Rgb::RED, Rgb::CYAN, Rgb::MAGENTA];

/// Complete state of the blink demo
#[derive(Debug, Clone)]
pub struct Blink {
    pub radius: f32,
    pub color_index: usize,
    /// Colour changes so far
    pub changes: u64,
    /// Total simulated time in seconds
    pub elapsed: f64,
    timer: Periodic,
    rng: Pcg32,
}

impl Blink {
    pub fn new(settings: &BlinkSettings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let color_index = rng.random_range(0..PALETTE.len());
        Self {
            radius: settings.radius,
            color_index,
            changes: 0,
            elapsed: 0.0,
            timer: Periodic::new(settings.period),
            rng,
        }
    }

    pub fn color(&self) -> Rgb {
        PALETTE[self.color_index]
    }
}

impl Simulation for Blink {
    type Input = ();

    fn tick(&mut self, _input: &(), dt: f32) {
        self.elapsed += dt as f64;
        for _ in 0..self.timer.advance(dt) {
            self.color_index = self.rng.random_range(0..PALETTE.len());
            self.changes += 1;
        }
    }
}
