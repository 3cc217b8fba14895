//! `cpm-output`: report writers for the contractile particle model.
//!
//! The CSV backend creates three files in its output directory:
//!
//! | File                     | One row per                                  |
//! |--------------------------|----------------------------------------------|
//! | `tick_summaries.csv`     | tick, with counters after the tick           |
//! | `particle_snapshots.csv` | active particle at each snapshot tick        |
//! | `death_markers.csv`      | particle removed by crush stress             |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `cpm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cpm_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run_until_complete(100_000, &mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DeathMarkerRow, ParticleSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
