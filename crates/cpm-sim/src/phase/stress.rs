//! Crush stress, death, and removal of the dead.

use cpm_core::Tick;
use cpm_entity::{DeathLog, DeathMarker, Particle, ParticleStore, PopulationStats};

/// Relative slack on the stress threshold.  Repeated `stress_rate · dt`
/// increments land a few ulps short of a threshold they reach exactly in
/// real arithmetic.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Accrue or relieve stress and flag deaths.
///
/// At or above its crush threshold a particle gains `stress_rate · dt`;
/// below it, stress decays by `dt`, floored at zero.  Reaching the stress
/// threshold (within `THRESHOLD_TOLERANCE`) sets `dead`, which is never
/// cleared.  Returns how many particles are flagged dead after the pass.
pub fn accrue(particles: &mut [Particle], stress_rate: f64, dt: f64) -> usize {
    let mut dead = 0;
    for p in particles {
        if p.contacts >= p.profile.crush_threshold {
            p.stress += stress_rate * dt;
        } else {
            p.stress = (p.stress - dt).max(0.0);
        }
        if p.stress >= p.profile.stress_threshold * (1.0 - THRESHOLD_TOLERANCE) {
            p.dead = true;
        }
        dead += usize::from(p.dead);
    }
    dead
}

/// Remove dead particles from the active set.
///
/// Each removal is counted in `stats` and leaves a [`DeathMarker`] at the
/// particle's last position, appended to `log` in active-set order.
/// Returns the number removed.
pub fn purge(
    store: &mut ParticleStore,
    log:   &mut DeathLog,
    stats: &mut PopulationStats,
    now:   Tick,
) -> usize {
    let marks: Vec<bool> = store.iter().map(|p| p.dead).collect();
    let dead = store.compact(&marks);
    for p in &dead {
        stats.record_death(p.demographic());
        log.push(DeathMarker {
            particle:    p.id,
            position:    p.position,
            demographic: p.demographic(),
            tick:        now,
        });
    }
    dead.len()
}
