//! Per-particle state.

use cpm_core::{Demographic, DemographicProfile, ParticleId, TargetId, Vec2};

/// A velocity vector together with its cached magnitude.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub vector: Vec2,
    pub magnitude: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { vector: Vec2::ZERO, magnitude: 0.0 };

    /// Velocity of `magnitude` along the unit vector `direction`.
    #[inline]
    pub fn along(direction: Vec2, magnitude: f64) -> Self {
        Self { vector: direction * magnitude, magnitude }
    }
}

/// One pedestrian.
///
/// The demographic profile is copied in at creation; every tick phase reads
/// bounds and thresholds from `profile` and never consults the registry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec2,

    /// Current radius, always within `[profile.r_min, profile.r_max]`.
    pub radius: f64,

    /// Goal-seeking velocity planned this tick.
    pub desired: Velocity,

    /// Contact-avoidance velocity.  Used as an accumulation buffer during
    /// contact resolution, then normalized.
    pub escape: Velocity,

    /// Nearest target, or `None` when the scene has no targets.
    pub target: Option<TargetId>,

    pub in_contact: bool,

    /// Contacts (particles and walls) found this tick.
    pub contacts: u32,

    /// Accumulated crush stress, never negative.
    pub stress: f64,

    /// Set once stress crosses the profile threshold; never cleared.
    pub dead: bool,

    pub profile: DemographicProfile,
}

impl Particle {
    /// A fully compressed particle at rest with no stress.
    pub fn new(id: ParticleId, position: Vec2, profile: DemographicProfile) -> Self {
        Self {
            id,
            position,
            radius:     profile.r_min,
            desired:    Velocity::ZERO,
            escape:     Velocity::ZERO,
            target:     None,
            in_contact: false,
            contacts:   0,
            stress:     0.0,
            dead:       false,
            profile,
        }
    }

    #[inline]
    pub fn demographic(&self) -> Demographic {
        self.profile.demographic
    }

    /// `true` while the radius is strictly above its minimum.  Such a
    /// particle walks with its desired velocity; a squeezed one escapes.
    #[inline]
    pub fn is_relaxed(&self) -> bool {
        self.radius > self.profile.r_min
    }

    /// Radius normalized to `[0, 1]` over the profile's bounds.
    #[inline]
    pub fn expansion(&self) -> f64 {
        (self.radius - self.profile.r_min) / (self.profile.r_max - self.profile.r_min)
    }

    /// Stress as a fraction of the death threshold (renderers use this for
    /// shading).
    #[inline]
    pub fn stress_ratio(&self) -> f64 {
        if self.profile.stress_threshold > 0.0 {
            self.stress / self.profile.stress_threshold
        } else {
            1.0
        }
    }

    /// Clear last tick's contact state before contact resolution.
    #[inline]
    pub fn clear_contacts(&mut self) {
        self.in_contact = false;
        self.contacts = 0;
        self.escape = Velocity::ZERO;
    }

    /// Record one contact and add `push` to the escape buffer.
    #[inline]
    pub fn touch(&mut self, push: Option<Vec2>) {
        self.in_contact = true;
        self.contacts += 1;
        if let Some(push) = push {
            self.escape.vector += push;
        }
    }
}
