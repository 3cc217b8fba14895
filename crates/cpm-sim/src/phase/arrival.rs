//! Target-reached detection and removal.

use cpm_entity::{Particle, ParticleStore, PopulationStats, Target};

/// `true` if `p` is within `arrival_radius` of its assigned target.
#[inline]
pub fn has_arrived(p: &Particle, targets: &[Target], arrival_radius: f64) -> bool {
    p.target
        .and_then(|id| targets.get(id.index()))
        .is_some_and(|t| t.position.distance(p.position) <= arrival_radius)
}

/// Remove every particle that has reached its target, counting each one in
/// `stats`.  Returns the number removed.
pub fn purge(
    store:          &mut ParticleStore,
    targets:        &[Target],
    arrival_radius: f64,
    stats:          &mut PopulationStats,
) -> usize {
    let marks: Vec<bool> = store
        .iter()
        .map(|p| has_arrived(p, targets, arrival_radius))
        .collect();
    let arrived = store.compact(&marks);
    for p in &arrived {
        stats.record_arrival(p.demographic());
    }
    arrived.len()
}
