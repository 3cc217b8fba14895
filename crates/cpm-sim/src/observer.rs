//! Simulation observer trait for progress reporting and data collection.

use std::time::Duration;

use cpm_core::Tick;
use cpm_entity::{DeathMarker, Particle, PopulationStats};

/// What happened during one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    /// Simulated seconds at the end of the tick.
    pub sim_time_secs: f64,
    /// Particles removed by the stress phase.
    pub deaths: usize,
    /// Particles removed by the arrival phase.
    pub arrivals: usize,
    /// Particles still active after the tick.
    pub active: usize,
}

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: death printer
///
/// ```rust,ignore
/// struct DeathPrinter;
///
/// impl SimObserver for DeathPrinter {
///     fn on_death(&mut self, tick: Tick, marker: &DeathMarker) {
///         println!("{tick}: {} crushed at {}", marker.demographic, marker.position);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any phase runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per particle removed by the stress phase, right after
    /// its marker is logged.
    fn on_death(&mut self, _tick: Tick, _marker: &DeathMarker) {}

    /// Called at the end of each tick with the post-tick counters.
    fn on_tick_end(&mut self, _report: &TickReport, _stats: &PopulationStats) {}

    /// Called at snapshot intervals with the active particles after the tick.
    fn on_snapshot(&mut self, _tick: Tick, _particles: &[Particle]) {}

    /// Called once, on the tick the last particle left the arena.
    ///
    /// `at` is the wall-clock reading of the simulation's injected clock.
    fn on_complete(&mut self, _tick: Tick, _at: Duration) {}

    /// Called once when [`Sim::run_until_complete`](crate::Sim::run_until_complete)
    /// returns.  [`Sim::run_ticks`](crate::Sim::run_ticks) never calls it, so
    /// paced drivers that step in frames report the end themselves.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
