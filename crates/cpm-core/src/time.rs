//! Simulation time model and the injectable wall clock.
//!
//! # Design
//!
//! Simulated time is a monotonically increasing `Tick` counter.  Each tick
//! advances the model by one fixed step `dt` (seconds), held in `SimClock`:
//!
//!   sim_time = tick * dt
//!
//! Wall-clock time never drives the model.  It enters only through the
//! [`Clock`] capability, which the simulation reads to stamp the moment a
//! run was started and the moment the last particle left the arena.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps tick counts to simulated seconds.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Seconds of simulated time per tick.
    pub dt: f64,
    /// The current tick, advanced by `SimClock::advance()` after each step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt: f64) -> Self {
        Self { dt, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Rewind to tick 0, keeping `dt`.
    #[inline]
    pub fn rewind(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// Simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.dt
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── Wall clock capability ────────────────────────────────────────────────────

/// Monotonic time source injected into the simulation.
///
/// `now()` is measured from an arbitrary, fixed origin; only differences
/// between two readings are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// A [`Clock`] backed by `std::time::Instant`, with its origin at creation.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A hand-driven [`Clock`] for tests and replay.
///
/// Clones share the same underlying reading, so a test can keep one handle
/// and advance time while the simulation holds the other.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}
