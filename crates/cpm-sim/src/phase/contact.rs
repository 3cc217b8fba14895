//! Contact detection and escape-velocity accumulation.
//!
//! O(n² + n·b) per tick: every unordered particle pair, then every
//! particle against every wall.

use cpm_core::Vec2;
use cpm_entity::{Boundary, Particle, Velocity};

/// Find this tick's contacts and set every particle's escape velocity.
///
/// 1. Reset each particle's contact flag, count and escape buffer.
/// 2. For each pair `i < j` whose discs overlap, both are marked in contact
///    and each accumulates the unit vector pointing away from the other plus
///    its *own* current desired velocity.  A particle pushed from behind thus
///    keeps moving forward, while one pushing into a crowd is held back.
/// 3. For each wall closer than the particle's radius, the particle is marked
///    in contact and accumulates the unit vector from the wall's nearest
///    point toward its centre.
/// 4. Each particle in contact has its buffer normalized and scaled to its
///    own `vd_max`; a buffer that summed to zero stays zero.
///
/// Coincident centres (or a centre lying on a wall) still count as a
/// contact but add no direction.
pub fn resolve(particles: &mut [Particle], boundaries: &[Boundary]) {
    for p in particles.iter_mut() {
        p.clear_contacts();
    }

    let n = particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (pi, pj) = pair_mut(particles, i, j);
            let offset = pi.position - pj.position;
            let distance = offset.length();
            if distance < pi.radius + pj.radius {
                let away = (distance > 0.0).then(|| offset / distance);
                let own_i = pi.desired.vector;
                let own_j = pj.desired.vector;
                pi.touch(away.map(|e| e + own_i));
                pj.touch(away.map(|e| -e + own_j));
            }
        }
    }

    for p in particles.iter_mut() {
        for wall in boundaries {
            let prox = wall.segment.proximity(p.position);
            if prox.distance < p.radius {
                let away = (prox.distance > 0.0).then(|| (p.position - prox.point) / prox.distance);
                p.touch(away);
            }
        }
    }

    for p in particles.iter_mut().filter(|p| p.in_contact) {
        p.escape = escape_velocity(p.escape.vector, p.profile.vd_max);
    }
}

/// Scale the accumulated push to `speed`, or zero if it has no direction.
fn escape_velocity(accumulated: Vec2, speed: f64) -> Velocity {
    let direction = accumulated.normalize_or_zero();
    if direction.is_zero() {
        Velocity::ZERO
    } else {
        Velocity::along(direction, speed)
    }
}

/// Disjoint mutable borrows of elements `i < j`.
#[inline]
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert!(i < j);
    let (head, tail) = particles.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
