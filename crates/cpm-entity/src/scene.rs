//! Static arena geometry: walls and exit targets.

use cpm_core::{BoundaryId, Segment, TargetId, Vec2};

/// A point particles walk toward.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub id: TargetId,
    pub position: Vec2,
}

/// A wall segment particles cannot overlap.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    pub id: BoundaryId,
    pub segment: Segment,
}

/// Append-only lists of boundaries and targets.
///
/// Entries are never modified or removed individually; ids are list
/// positions.  Only a full reset clears the scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    boundaries: Vec<Boundary>,
    targets: Vec<Target>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_boundary(&mut self, segment: Segment) -> BoundaryId {
        let id = BoundaryId(self.boundaries.len() as u32);
        self.boundaries.push(Boundary { id, segment });
        id
    }

    pub fn add_target(&mut self, position: Vec2) -> TargetId {
        let id = TargetId(self.targets.len() as u32);
        self.targets.push(Target { id, position });
        id
    }

    #[inline]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    #[inline]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn clear(&mut self) {
        self.boundaries.clear();
        self.targets.clear();
    }
}
