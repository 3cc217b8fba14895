//! Where particles died.

use cpm_core::{Demographic, ParticleId, Tick, Vec2};

/// Immutable record of one death.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathMarker {
    pub particle: ParticleId,
    pub position: Vec2,
    pub demographic: Demographic,
    /// Tick during which the particle died.
    pub tick: Tick,
}

/// Append-only log of [`DeathMarker`]s in the order deaths occurred.
#[derive(Clone, Debug, Default)]
pub struct DeathLog {
    markers: Vec<DeathMarker>,
}

impl DeathLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: DeathMarker) {
        self.markers.push(marker);
    }

    #[inline]
    pub fn as_slice(&self) -> &[DeathMarker] {
        &self.markers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers appended at or after index `from`, so an observer can pick up
    /// only the deaths of the latest tick.
    #[inline]
    pub fn since(&self, from: usize) -> &[DeathMarker] {
        self.markers.get(from..).unwrap_or(&[])
    }

    /// Forget every marker.  Only a full model reset may call this.
    pub fn reset(&mut self) {
        self.markers.clear();
    }
}
