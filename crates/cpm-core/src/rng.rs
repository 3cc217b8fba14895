//! Deterministic simulation RNG.
//!
//! Randomness is confined to particle creation (demographic sampling and
//! spawn jitter); no tick phase draws from it.  A model built from the same
//! seed and the same sequence of scene-building calls therefore spawns an
//! identical population, and every subsequent tick is reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG used while populating the scene.
pub struct SimRng {
    seed: u64,
    inner: SmallRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng { seed, inner: SmallRng::seed_from_u64(seed) }
    }

    /// The seed this generator was created from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind to the state right after construction.
    pub fn reseed(&mut self) {
        self.inner = SmallRng::seed_from_u64(self.seed);
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }

    /// Uniform draw in `[-width/2, width/2)`.
    #[inline]
    pub fn centered(&mut self, width: f64) -> f64 {
        (self.unit() - 0.5) * width
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.inner.gen_range(range)
    }
}
