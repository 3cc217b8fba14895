//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `tick_summaries.csv`
//! - `particle_snapshots.csv`
//! - `death_markers.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DeathMarkerRow, OutputResult, ParticleSnapshotRow, TickSummaryRow};

pub const TICK_SUMMARY_HEADER: [&str; 7] =
    ["tick", "sim_time_secs", "active", "reached_target", "died", "deaths", "arrivals"];

pub const SNAPSHOT_HEADER: [&str; 14] = [
    "tick", "particle_id", "demographic", "x", "y", "radius", "desired_x", "desired_y",
    "escape_x", "escape_y", "in_contact", "contacts", "stress", "target",
];

pub const DEATH_MARKER_HEADER: [&str; 4] = ["tick", "x", "y", "demographic"];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    snapshots: Writer<File>,
    deaths:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the three CSV files in it
    /// and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("particle_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut deaths = Writer::from_path(dir.join("death_markers.csv"))?;
        deaths.write_record(DEATH_MARKER_HEADER)?;

        tracing::debug!(dir = %dir.display(), "csv output opened");
        Ok(Self { summaries, snapshots, deaths, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.sim_time_secs.to_string(),
            row.active.to_string(),
            row.reached_target.to_string(),
            row.died.to_string(),
            row.deaths.to_string(),
            row.arrivals.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[ParticleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.particle_id.to_string(),
                row.demographic.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.radius.to_string(),
                row.desired_x.to_string(),
                row.desired_y.to_string(),
                row.escape_x.to_string(),
                row.escape_y.to_string(),
                u8::from(row.in_contact).to_string(),
                row.contacts.to_string(),
                row.stress.to_string(),
                row.target.map(|t| t.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_death(&mut self, row: &DeathMarkerRow) -> OutputResult<()> {
        self.deaths.write_record(&[
            row.tick.to_string(),
            row.x.to_string(),
            row.y.to_string(),
            row.demographic.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        self.deaths.flush()?;
        Ok(())
    }
}
