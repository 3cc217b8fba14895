//! Nearest-target assignment.

use cpm_core::{TargetId, Vec2};
use cpm_entity::{Particle, Target};

/// Point every particle at its nearest target.  Re-run each tick because
/// particles move relative to the exits.
pub fn assign_nearest(particles: &mut [Particle], targets: &[Target]) {
    for p in particles {
        p.target = nearest(p.position, targets);
    }
}

/// Index of the target closest to `position`; the lowest index wins a tie.
/// `None` when `targets` is empty.
pub fn nearest(position: Vec2, targets: &[Target]) -> Option<TargetId> {
    let mut best: Option<(TargetId, f64)> = None;
    for target in targets {
        let distance = target.position.distance(position);
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((target.id, distance));
        }
    }
    best.map(|(id, _)| id)
}
