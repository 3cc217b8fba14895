//! corridor: crowd evacuation through a two-exit corridor.
//!
//! Scatters 40 clusters of 5 pedestrians (Youth, Adult and Elderly in
//! 20/60/20 proportion) over a 14 m × 9 m room and runs the contractile
//! particle model until every pedestrian has either left through an exit or
//! been crushed.  Tick summaries, periodic particle snapshots and death
//! markers are written as CSV for external plotting.
//!
//! ```text
//! RUST_LOG=corridor=debug cargo run -p corridor -- --realtime --speed 0.5
//! ```

mod scene;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cpm_core::{DemographicRegistry, ModelConfig, Tick};
use cpm_entity::{DeathMarker, Particle, PopulationStats};
use cpm_output::{CsvWriter, SimOutputObserver};
use cpm_sim::{FrameScheduler, Sim, SimBuilder, SimObserver, TickReport};

// ── Constants ─────────────────────────────────────────────────────────────────

const FRAME: Duration = Duration::from_millis(16);

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON model configuration; defaults to the built-in corridor setup.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the CSV reports.
    #[arg(short, long, default_value = "output/corridor")]
    output: PathBuf,

    /// Skip writing CSV reports.
    #[arg(long)]
    no_output: bool,

    /// Write a particle snapshot every N ticks (0 disables).
    #[arg(long, default_value_t = 20)]
    snapshot_interval: u64,

    #[arg(long, default_value_t = 40)]
    clusters: usize,

    #[arg(long, default_value_t = 5)]
    cluster_size: usize,

    /// Override the configured seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Pace the run against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Wall seconds per simulated second in `--realtime` mode.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Log a progress line every N ticks.
    #[arg(long, default_value_t = 500)]
    progress_every: u64,
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// The built-in setup: the standard three-group population, accruing stress
/// faster than the model default.  Thresholds come from each group's profile.
fn corridor_config() -> (ModelConfig, DemographicRegistry) {
    let config = ModelConfig { stress_rate: 5.0, ..ModelConfig::default() };
    (config, DemographicRegistry::standard())
}

fn load_config(path: &Path) -> Result<(ModelConfig, DemographicRegistry)> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config: ModelConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    let registry = config.registry();
    Ok((config, registry))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs progress and forwards everything to the CSV observer when enabled.
struct CorridorObserver {
    output:         Option<SimOutputObserver<CsvWriter>>,
    progress_every: u64,
    snapshot_rows:  usize,
    summary_rows:   usize,
    death_rows:     usize,
}

impl CorridorObserver {
    fn new(output: Option<SimOutputObserver<CsvWriter>>, progress_every: u64) -> Self {
        Self { output, progress_every, snapshot_rows: 0, summary_rows: 0, death_rows: 0 }
    }
}

impl SimObserver for CorridorObserver {
    fn on_death(&mut self, tick: Tick, marker: &DeathMarker) {
        self.death_rows += 1;
        tracing::debug!(%tick, demographic = %marker.demographic, position = %marker.position, "crushed");
        if let Some(out) = &mut self.output {
            out.on_death(tick, marker);
        }
    }

    fn on_tick_end(&mut self, report: &TickReport, stats: &PopulationStats) {
        self.summary_rows += 1;
        if self.progress_every > 0 && report.tick.0.is_multiple_of(self.progress_every) {
            let total = stats.total();
            tracing::info!(
                tick = report.tick.0,
                sim_time_secs = report.sim_time_secs,
                active = report.active,
                reached = total.reached_target,
                died = total.died,
                "progress"
            );
        }
        if let Some(out) = &mut self.output {
            out.on_tick_end(report, stats);
        }
    }

    fn on_snapshot(&mut self, tick: Tick, particles: &[Particle]) {
        self.snapshot_rows += particles.len();
        if let Some(out) = &mut self.output {
            out.on_snapshot(tick, particles);
        }
    }

    fn on_complete(&mut self, tick: Tick, _at: Duration) {
        tracing::info!(%tick, "corridor cleared");
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        if let Some(out) = &mut self.output {
            out.on_sim_end(final_tick);
        }
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Step in wall-clock-paced frames until completion or `max_ticks`.
fn run_realtime(sim: &mut Sim, obs: &mut CorridorObserver, speed: f64, max_ticks: u64) -> Result<()> {
    let mut scheduler = FrameScheduler::new(speed)?;
    while !sim.is_complete() && sim.tick().0 < max_ticks {
        scheduler.advance(sim, obs);
        std::thread::sleep(FRAME);
    }
    obs.on_sim_end(sim.tick());
    Ok(())
}

fn print_summary(sim: &Sim, obs: &CorridorObserver) {
    let stats = sim.stats();
    println!();
    println!(
        "{:<10} {:<9} {:>8} {:>8} {:>8} {:>8}",
        "Group", "Colour", "Created", "Exited", "Died", "Active"
    );
    println!("{}", "-".repeat(56));
    for (demographic, c) in stats.by_demographic() {
        let colour = sim
            .registry()
            .get(*demographic)
            .map(|p| p.color.to_string())
            .unwrap_or_default();
        println!(
            "{:<10} {:<9} {:>8} {:>8} {:>8} {:>8}",
            demographic.name(), colour, c.created, c.reached_target, c.died, c.current
        );
    }
    let total = stats.total();
    println!("{}", "-".repeat(56));
    println!(
        "{:<10} {:<9} {:>8} {:>8} {:>8} {:>8}",
        "Total", "", total.created, total.reached_target, total.died, total.current
    );
    println!();

    match sim.completed_tick() {
        Some(tick) => println!(
            "Cleared at {tick} ({:.2} s simulated)",
            (tick.0 + 1) as f64 * sim.dt()
        ),
        None => println!("Not cleared after {} ({:.2} s simulated)", sim.tick(), sim.sim_time_secs()),
    }
    if let Some(elapsed) = sim.elapsed() {
        println!("Wall time: {:.3} s", elapsed.as_secs_f64());
    }
    println!(
        "Rows: {} tick summaries, {} snapshots, {} death markers",
        obs.summary_rows, obs.snapshot_rows, obs.death_rows
    );
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "corridor=info,cpm_sim=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // 1. Model configuration.
    let (mut config, registry) = match &args.config {
        Some(path) => load_config(path)?,
        None => corridor_config(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    // 2. Build the sim and the arena.
    let mut sim = SimBuilder::new(config)
        .registry(registry)
        .snapshot_interval(args.snapshot_interval)
        .build()?;
    scene::build_arena(&mut sim);
    let spawned = scene::populate(&mut sim, args.clusters, args.cluster_size, seed.wrapping_add(1))?;
    tracing::info!(
        spawned,
        walls = sim.boundaries().len(),
        exits = sim.targets().len(),
        dt = sim.dt(),
        "corridor populated"
    );

    // 3. Output.
    let output = if args.no_output {
        None
    } else {
        let writer = CsvWriter::new(&args.output)
            .with_context(|| format!("opening output directory {}", args.output.display()))?;
        Some(SimOutputObserver::new(writer))
    };
    let mut obs = CorridorObserver::new(output, args.progress_every);

    // 4. Run.
    sim.start();
    if args.realtime {
        run_realtime(&mut sim, &mut obs, args.speed, args.max_ticks)?;
    } else {
        sim.run_until_complete(args.max_ticks, &mut obs);
    }

    if let Some(e) = obs.output.as_mut().and_then(SimOutputObserver::take_error) {
        tracing::error!(error = %e, "output incomplete");
    }

    // 5. Summary.
    print_summary(&sim, &obs);
    if !args.no_output {
        println!("Reports written to {}", args.output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_config_thresholds_come_from_profiles() {
        let (config, registry) = corridor_config();
        let defaults = ModelConfig::default();
        assert_eq!(config.stress_rate, 5.0);
        assert_eq!(config.stress_threshold, defaults.stress_threshold);
        assert_eq!(config.crush_threshold, defaults.crush_threshold);
        let adult = registry.get(cpm_core::Demographic::Adult).expect("adult registered");
        assert_eq!((adult.stress_threshold, adult.crush_threshold), (3.0, 4));
    }
}
