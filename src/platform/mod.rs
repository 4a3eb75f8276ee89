//! Platform abstraction layer
//!
//! Handles terminal and OS details for:
//! - Time (injectable clocks)
//! - Fixed-step frame pacing
//! - Key events (see [`terminal`])

pub mod terminal;

use std::time::Instant;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame the loop will try to catch up on
pub const MAX_FRAME_SECS: f32 = 0.1;

/// Source of monotonic time in seconds
pub trait Clock {
    fn now_secs(&self) -> f64;
}

/// Wall clock backed by `Instant`
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn advance(&mut self, secs: f64) {
        self.now += secs.max(0.0);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now
    }
}

/// Accumulates frame time and hands out fixed simulation steps
#[derive(Debug, Default, Clone)]
pub struct FixedStep {
    accumulator: f32,
    last: Option<f64>,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `SIM_DT` ticks owed since the previous call
    pub fn advance(&mut self, clock: &impl Clock) -> u32 {
        let now = clock.now_secs();
        let dt = match self.last.replace(now) {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.accumulator += dt.clamp(0.0, MAX_FRAME_SECS);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog beyond the substep cap
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Forget any owed time (after a pause or menu)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last = None;
    }
}
