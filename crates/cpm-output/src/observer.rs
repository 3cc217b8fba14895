//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use cpm_core::Tick;
use cpm_entity::{DeathMarker, Particle, PopulationStats};
use cpm_sim::{SimObserver, TickReport};

use crate::row::{DeathMarkerRow, ParticleSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries, particle snapshots and
/// death markers to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After a run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).  `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!(error = %e, "output write failed; further errors suppressed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_death(&mut self, _tick: Tick, marker: &DeathMarker) {
        let result = self.writer.write_death(&DeathMarkerRow::from(marker));
        self.store_err(result);
    }

    fn on_tick_end(&mut self, report: &TickReport, stats: &PopulationStats) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::new(report, stats));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, particles: &[Particle]) {
        if particles.is_empty() {
            return;
        }
        let rows: Vec<ParticleSnapshotRow> =
            particles.iter().map(|p| ParticleSnapshotRow::new(tick, p)).collect();
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
