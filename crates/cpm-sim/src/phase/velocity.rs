//! Radius-coupled desired velocity.

use cpm_entity::{Particle, Target, Velocity};

/// Plan each particle's desired velocity toward its assigned target.
///
/// Speed follows `vd_max · ((r − r_min) / (r_max − r_min))^beta`: a fully
/// compressed particle wants to stand still, a relaxed one walks at full
/// speed.  No target, or already standing on it, gives zero velocity.
pub fn plan(particles: &mut [Particle], targets: &[Target], beta: f64) {
    for p in particles {
        let target = p.target.and_then(|id| targets.get(id.index()));
        p.desired = match target {
            Some(t) => {
                let offset = t.position - p.position;
                let distance = offset.length();
                if distance > 0.0 {
                    Velocity::along(offset / distance, desired_speed(p, beta))
                } else {
                    Velocity::ZERO
                }
            }
            None => Velocity::ZERO,
        };
    }
}

#[inline]
pub fn desired_speed(p: &Particle, beta: f64) -> f64 {
    p.profile.vd_max * p.expansion().powf(beta)
}
