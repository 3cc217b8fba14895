//! Radius contraction and regrowth.

use cpm_entity::Particle;

/// A particle in contact snaps to its minimum radius; a free one regrows
/// linearly at `r_max / tau` per second, capped at `r_max`.
pub fn adjust(particles: &mut [Particle], tau: f64, dt: f64) {
    for p in particles {
        p.radius = if p.in_contact {
            p.profile.r_min
        } else {
            let growth = (p.profile.r_max / tau) * dt;
            (p.radius + growth).min(p.profile.r_max)
        };
    }
}
