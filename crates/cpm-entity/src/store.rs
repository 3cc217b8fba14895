//! The `ParticleStore`: active particles in creation order.

use cpm_core::{DemographicProfile, ParticleId, Vec2};

use crate::Particle;

/// Holds every active particle.
///
/// Iteration order is creation order and removal preserves it.  Removal is
/// two phase: a phase first computes a drop mark per particle without touching
/// the collection, then [`compact`](Self::compact) rebuilds the active set
/// and hands the dropped particles back in their original order.
#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    next_id: u32,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a particle from `profile` at `position` and return its id.
    pub fn spawn(&mut self, position: Vec2, profile: DemographicProfile) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.particles.push(Particle::new(id, position, profile));
        id
    }

    #[inline]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every particle whose mark is `true`, returning them in order.
    ///
    /// # Panics
    /// Panics if `marks.len() != self.len()`.
    pub fn compact(&mut self, marks: &[bool]) -> Vec<Particle> {
        assert_eq!(marks.len(), self.particles.len(), "one mark per particle");
        if !marks.contains(&true) {
            return Vec::new();
        }

        let mut kept = Vec::with_capacity(self.particles.len());
        let mut dropped = Vec::new();
        for (particle, &drop) in std::mem::take(&mut self.particles).into_iter().zip(marks) {
            if drop {
                dropped.push(particle);
            } else {
                kept.push(particle);
            }
        }
        self.particles = kept;
        dropped
    }

    /// Remove all particles and restart id assignment.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.next_id = 0;
    }
}

impl<'a> IntoIterator for &'a ParticleStore {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
