//! Fixed timestep driver
//!
//! Wall-clock frame deltas go into an accumulator that is drained in whole
//! ticks. Rendering happens once per frame after draining, never mid-tick.

use std::time::Instant;

/// A simulation context advanced by [`FixedTimestep`]
pub trait Simulation {
    /// Input snapshot consumed by each tick
    type Input;

    /// Ticks are skipped (but still drained) while this returns false
    fn is_live(&self) -> bool {
        true
    }

    /// Advance the simulation by one fixed step of `dt` seconds
    fn tick(&mut self, input: &Self::Input, dt: f32);

    /// Reset one-shot commands after they have been applied once
    fn clear_one_shots(_input: &mut Self::Input) {}
}

/// Accumulates frame time and drains it in fixed-size ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    ticks: u64,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        assert!(dt > 0.0, "tick duration must be positive");
        Self {
            dt,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Unconsumed time carried to the next frame
    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Total ticks drained since construction (gated ticks included)
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Accumulate `frame_delta` and drain it in whole ticks.
    ///
    /// `sim` ticks once per drained tick while it reports itself live. A
    /// gated tick still consumes its time, so a liveness condition that
    /// turns permanently false never stalls the accumulator. One-shot
    /// inputs are cleared after the first tick that sees them.
    ///
    /// Returns the number of ticks drained.
    pub fn advance<S: Simulation>(
        &mut self,
        frame_delta: f32,
        sim: &mut S,
        input: &mut S::Input,
    ) -> u32 {
        if frame_delta.is_finite() && frame_delta > 0.0 {
            self.accumulator += frame_delta;
        }

        let (drained, remainder) = split_periods(self.accumulator, self.dt);
        for _ in 0..drained {
            if sim.is_live() {
                sim.tick(input, self.dt);
                S::clear_one_shots(input);
            }
        }
        self.accumulator = remainder;
        self.ticks += u64::from(drained);
        drained
    }
}

/// Whole periods in `total` and what is left over, in `[0, period)`.
///
/// Counted in one division so a huge total cannot stall a subtract loop once
/// `total - period` rounds back to `total`. Counts beyond `u32::MAX` are
/// dropped.
fn split_periods(total: f32, period: f32) -> (u32, f32) {
    let total = f64::from(total);
    let period = f64::from(period);
    let whole = (total / period).floor();
    let remainder = (total - whole * period).clamp(0.0, period) as f32;
    // f64 -> u32 casts saturate
    let count = whole as u32;
    if remainder >= period as f32 {
        (count.saturating_add(1), 0.0)
    } else {
        (count, remainder)
    }
}

/// Coarser accumulate-and-drain timer for periodic events
/// (ball generation, colour changes)
#[derive(Debug, Clone)]
pub struct Periodic {
    period: f32,
    elapsed: f32,
}

impl Periodic {
    pub fn new(period: f32) -> Self {
        assert!(period > 0.0, "period must be positive");
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Accumulate `delta` and return how many whole periods elapsed.
    /// Periods are consumed even when the caller chooses not to act on them.
    pub fn advance(&mut self, delta: f32) -> u32 {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
        let (fired, remainder) = split_periods(self.elapsed, self.period);
        self.elapsed = remainder;
        fired
    }
}

/// Wall-clock source producing monotonic per-frame deltas
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or construction), restarting the clock
    pub fn restart(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        elapsed
    }
}
