//! `cpm-entity`: the entity model of the contractile particle simulation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`particle`] | `Particle`, `Velocity`: one pedestrian and its per-tick state  |
//! | [`store`]    | `ParticleStore`: the active set with mark/compact removal      |
//! | [`scene`]    | `Target`, `Boundary`, `Scene`: immutable arena geometry        |
//! | [`marker`]   | `DeathMarker`, `DeathLog`: append-only record of deaths        |
//! | [`stats`]    | `Counters`, `PopulationStats`: global and per-demographic tally|
//!
//! Everything here is plain data plus bookkeeping.  The tick phases that
//! mutate it live in `cpm-sim`.

pub mod marker;
pub mod particle;
pub mod scene;
pub mod stats;
pub mod store;


pub use marker::{DeathLog, DeathMarker};
pub use particle::{Particle, Velocity};
pub use scene::{Boundary, Scene, Target};
pub use stats::{Counters, PopulationStats};
pub use store::ParticleStore;
