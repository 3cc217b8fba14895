//! The `OutputWriter` trait implemented by backend writers.

use crate::{DeathMarkerRow, OutputResult, ParticleSnapshotRow, TickSummaryRow};

/// A sink for the three report tables.
///
/// Errors are returned to [`SimOutputObserver`][crate::SimOutputObserver],
/// which keeps the first one for [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write a batch of particle snapshots taken at the same tick.
    fn write_snapshots(&mut self, rows: &[ParticleSnapshotRow]) -> OutputResult<()>;

    /// Write one death marker.
    fn write_death(&mut self, row: &DeathMarkerRow) -> OutputResult<()>;

    /// Flush all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
