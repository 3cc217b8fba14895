//! Wall-clock pacing for interactive drivers.
//!
//! The model itself is driven purely by tick count.  A front end that wants
//! the simulation to keep pace with real time asks a [`FrameScheduler`] how
//! many ticks are due each frame and runs exactly that many.

use std::time::Duration;

use cpm_core::Clock;

use crate::{Sim, SimError, SimObserver, SimResult};

/// Converts elapsed wall time into a whole number of ticks.
///
/// With `speed_factor = 1.0` one tick of `dt` simulated seconds is due per
/// `dt` wall seconds; `0.5` runs twice as fast as real time.  Leftover time
/// that does not fill a whole tick carries into the next frame until at
/// least one tick runs.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    speed_factor: f64,
    last_frame:   Option<Duration>,
}

impl FrameScheduler {
    pub fn new(speed_factor: f64) -> SimResult<Self> {
        if !(speed_factor > 0.0 && speed_factor.is_finite()) {
            return Err(SimError::Config(format!(
                "speed_factor must be positive and finite (got {speed_factor})"
            )));
        }
        Ok(Self { speed_factor, last_frame: None })
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Ticks due at wall time `now` for a model stepping `dt` seconds.
    ///
    /// The first call after construction or [`pause`](Self::pause) only sets
    /// the frame mark and returns 0.
    pub fn steps_due(&mut self, now: Duration, dt: f64) -> u64 {
        let last = *self.last_frame.get_or_insert(now);
        let elapsed = now.saturating_sub(last).as_secs_f64();
        let due = (elapsed / (dt * self.speed_factor)).floor() as u64;
        if due > 0 {
            self.last_frame = Some(now);
        }
        due
    }

    /// Run every tick due now on `sim`.  Returns the number run.
    pub fn advance<C: Clock, O: SimObserver>(&mut self, sim: &mut Sim<C>, observer: &mut O) -> u64 {
        let due = self.steps_due(sim.wall_clock().now(), sim.dt());
        sim.run_ticks(due, observer);
        due
    }

    /// Forget the frame mark so time spent paused is not caught up later.
    pub fn pause(&mut self) {
        self.last_frame = None;
    }
}
