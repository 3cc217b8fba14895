//! `cpm-sim`: tick orchestrator for the contractile particle model.
//!
//! # Tick
//!
//! ```text
//! for each tick:
//!   ① Contacts   : pairwise (i < j) and wall overlaps; escape velocities
//!   ② Radii      : snap to r_min on contact, else regrow toward r_max
//!   ③ Stress     : accrue while crushed, decay otherwise; flag and purge
//!                   the dead, logging a DeathMarker for each
//!   ④ Targets    : nearest target per particle
//!   ⑤ Velocities : radius-coupled desired velocity toward the target
//!   ⑥ Integrate  : desired velocity if relaxed, escape velocity if squeezed
//!   ⑦ Arrivals   : purge particles within arrival_radius of their target;
//!                   latch completion once everyone arrived or died
//! ```
//!
//! The order is fixed.  Moving any phase changes the dynamics.
//!
//! Ticks are single-threaded and deterministic: particles are visited in
//! creation order, pairs as `i < j`, and randomness is only drawn when the
//! scene is populated.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cpm_core::{DemographicRegistry, ModelConfig, Segment, Vec2};
//! use cpm_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(ModelConfig::default())
//!     .registry(DemographicRegistry::standard())
//!     .build()?;
//! sim.add_boundary(Segment::from_coords(1.0, 1.0, 15.0, 1.0));
//! sim.add_target(Vec2::new(17.0, 3.0));
//! sim.add_particles_with_demographics(Vec2::new(5.0, 5.0), 5)?;
//! sim.start();
//! sim.run_until_complete(100_000, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod phase;
pub mod scheduler;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickReport};
pub use scheduler::FrameScheduler;
pub use sim::Sim;
