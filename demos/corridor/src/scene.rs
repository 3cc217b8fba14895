//! The exit-corridor arena.
//!
//! A 14 m × 9 m room open on its right side, narrowing through two angled
//! walls into a 5 m gap with one exit point beyond each corner.

use cpm_core::{Clock, Segment, SimRng, Vec2};
use cpm_sim::{Sim, SimResult};

pub const WALLS: [Segment; 5] = [
    Segment::from_coords(1.0, 1.0, 15.0, 1.0),
    Segment::from_coords(1.0, 1.0, 1.0, 10.0),
    Segment::from_coords(1.0, 10.0, 15.0, 10.0),
    Segment::from_coords(15.0, 1.0, 16.0, 3.0),
    Segment::from_coords(15.0, 10.0, 16.0, 8.0),
];

pub const EXITS: [Vec2; 2] = [Vec2::new(17.0, 3.0), Vec2::new(17.0, 8.0)];

/// Add the walls and exits to `sim`.
pub fn build_arena<C: Clock>(sim: &mut Sim<C>) {
    for wall in WALLS {
        sim.add_boundary(wall);
    }
    for exit in EXITS {
        sim.add_target(exit);
    }
}

/// Scatter `clusters` groups of `cluster_size` pedestrians uniformly over
/// the room interior, then give everyone their nearest exit.
///
/// Cluster centres come from their own RNG stream so changing the cluster
/// count does not reshuffle demographics inside the sim.
pub fn populate<C: Clock>(
    sim:          &mut Sim<C>,
    clusters:     usize,
    cluster_size: usize,
    seed:         u64,
) -> SimResult<usize> {
    let mut rng = SimRng::new(seed);
    let mut spawned = 0;
    for _ in 0..clusters {
        let centre = Vec2::new(rng.gen_range(2.0..14.0), rng.gen_range(2.0..9.0));
        spawned += sim.add_particles_with_demographics(centre, cluster_size)?.len();
    }
    sim.assign_targets();
    Ok(spawned)
}
