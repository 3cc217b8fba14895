//! Plain data row types written by output backends.

use cpm_core::{Demographic, Tick};
use cpm_entity::{DeathMarker, Particle, PopulationStats};
use cpm_sim::TickReport;

/// Counters after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    /// Simulated seconds elapsed at the end of the tick.
    pub sim_time_secs:  f64,
    pub active:         u64,
    pub reached_target: u64,
    pub died:           u64,
    /// Deaths during this tick only.
    pub deaths:         u64,
    /// Arrivals during this tick only.
    pub arrivals:       u64,
}

impl TickSummaryRow {
    pub fn new(report: &TickReport, stats: &PopulationStats) -> Self {
        let total = stats.total();
        Self {
            tick:           report.tick.0,
            sim_time_secs:  report.sim_time_secs,
            active:         report.active as u64,
            reached_target: total.reached_target,
            died:           total.died,
            deaths:         report.deaths as u64,
            arrivals:       report.arrivals as u64,
        }
    }
}

/// The state of one active particle at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshotRow {
    pub tick:        u64,
    pub particle_id: u32,
    pub demographic: Demographic,
    pub x:           f64,
    pub y:           f64,
    pub radius:      f64,
    pub desired_x:   f64,
    pub desired_y:   f64,
    pub escape_x:    f64,
    pub escape_y:    f64,
    pub in_contact:  bool,
    pub contacts:    u32,
    pub stress:      f64,
    /// Index of the assigned target; `None` while no target exists.
    pub target:      Option<u32>,
}

impl ParticleSnapshotRow {
    pub fn new(tick: Tick, p: &Particle) -> Self {
        Self {
            tick:        tick.0,
            particle_id: p.id.0,
            demographic: p.demographic(),
            x:           p.position.x,
            y:           p.position.y,
            radius:      p.radius,
            desired_x:   p.desired.vector.x,
            desired_y:   p.desired.vector.y,
            escape_x:    p.escape.vector.x,
            escape_y:    p.escape.vector.y,
            in_contact:  p.in_contact,
            contacts:    p.contacts,
            stress:      p.stress,
            target:      p.target.map(|t| t.0),
        }
    }
}

/// Where and when a particle was crushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathMarkerRow {
    pub tick:        u64,
    pub x:           f64,
    pub y:           f64,
    pub demographic: Demographic,
}

impl From<&DeathMarker> for DeathMarkerRow {
    fn from(marker: &DeathMarker) -> Self {
        Self {
            tick:        marker.tick.0,
            x:           marker.position.x,
            y:           marker.position.y,
            demographic: marker.demographic,
        }
    }
}
