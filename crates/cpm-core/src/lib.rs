//! `cpm-core`: foundational types for the contractile particle model.
//!
//! This crate is a dependency of every other `cpm-*` crate.  It has no
//! `cpm-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`geo`]           | `Vec2`, `Segment`, nearest point on a segment             |
//! | [`ids`]           | `ParticleId`, `TargetId`, `BoundaryId`                    |
//! | [`time`]          | `Tick`, `SimClock`, injectable wall `Clock`               |
//! | [`rng`]           | `SimRng` (seeded, creation-time only)                     |
//! | [`demographic`]   | `Demographic`, `DemographicProfile`, `DemographicRegistry`|
//! | [`config`]        | `ModelConfig`                                             |
//! | [`error`]         | `CpmError`, `CpmResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod config;
pub mod demographic;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::ModelConfig;
pub use demographic::{Demographic, DemographicProfile, DemographicRegistry, Rgb};
pub use error::{CpmError, CpmResult};
pub use geo::{Segment, SegmentProximity, Vec2};
pub use ids::{BoundaryId, ParticleId, TargetId};
pub use rng::SimRng;
pub use time::{Clock, ManualClock, MonotonicClock, SimClock, Tick};
