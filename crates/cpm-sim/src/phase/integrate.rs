//! Explicit position update.

use cpm_entity::Particle;

/// Move every particle by one step of length `dt`.
///
/// A relaxed particle (`r > r_min`) walks with its desired velocity; a
/// squeezed one uses its escape velocity instead.
pub fn advance(particles: &mut [Particle], dt: f64) {
    for p in particles {
        let velocity = if p.is_relaxed() { p.desired.vector } else { p.escape.vector };
        p.position += velocity * dt;
    }
}
