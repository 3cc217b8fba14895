//! The seven tick phases, in the order [`Sim`](crate::Sim) runs them.
//!
//! Each phase is a free function over the particle slice (plus whatever
//! scene data it reads), so phases can be exercised in isolation.  The two
//! purging phases take the [`ParticleStore`](cpm_entity::ParticleStore)
//! itself because they shrink the active set.

pub mod arrival;
pub mod contact;
pub mod integrate;
pub mod radius;
pub mod stress;
pub mod targeting;
pub mod velocity;
