//! The `Sim` struct and its tick.

use std::time::Duration;

use cpm_core::{
    BoundaryId, Clock, Demographic, DemographicRegistry, ModelConfig, MonotonicClock, ParticleId,
    Segment, SimClock, SimRng, TargetId, Tick, Vec2,
};
use cpm_entity::{
    Boundary, DeathLog, DeathMarker, Particle, ParticleStore, PopulationStats, Scene, Target,
};

use crate::phase::{arrival, contact, integrate, radius, stress, targeting, velocity};
use crate::{NoopObserver, SimError, SimObserver, SimResult, TickReport};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation context: configuration, scene, active particles, death
/// log, counters and timestamps.
///
/// `Sim<C>` owns every mutable collection.  Callers build the scene through
/// the `add_*` methods, then advance it with [`step`](Self::step) or the
/// `run_*` helpers; everything else is exposed read-only.
///
/// Each tick runs these phases in a fixed order:
///
/// 1. **Contacts**: pairwise and wall overlaps, escape velocities.
/// 2. **Radii**: compress on contact, otherwise regrow.
/// 3. **Stress**: accrue/decay, flag deaths, purge the dead.
/// 4. **Targets**: nearest-target assignment.
/// 5. **Velocities**: radius-coupled desired velocity.
/// 6. **Integration**: move by desired or escape velocity.
/// 7. **Arrivals**: purge particles at their target; latch completion.
///
/// Radii must reflect this tick's contacts before stress and speed are
/// evaluated, and the dead are purged before anyone retargets or moves, so
/// a dead particle never moves or counts as an arrival.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<C: Clock = MonotonicClock> {
    pub(crate) config:            ModelConfig,
    pub(crate) registry:          DemographicRegistry,
    pub(crate) clock:             SimClock,
    pub(crate) wall:              C,
    pub(crate) rng:               SimRng,
    pub(crate) particles:         ParticleStore,
    pub(crate) scene:             Scene,
    pub(crate) deaths:            DeathLog,
    pub(crate) stats:             PopulationStats,
    pub(crate) snapshot_interval: u64,
    pub(crate) started_at:        Option<Duration>,
    pub(crate) completed:         Option<(Tick, Duration)>,
}

impl<C: Clock> Sim<C> {
    // ── Scene building ────────────────────────────────────────────────────

    pub fn add_boundary(&mut self, segment: Segment) -> BoundaryId {
        self.scene.add_boundary(segment)
    }

    pub fn add_target(&mut self, position: Vec2) -> TargetId {
        self.scene.add_target(position)
    }

    /// Add one particle of `demographic` at `position`.
    ///
    /// Fails with `UnregisteredDemographic` if the registry has no profile
    /// for `demographic`; nothing is added in that case.
    pub fn add_particle(&mut self, position: Vec2, demographic: Demographic) -> SimResult<ParticleId> {
        let profile = self.registry.resolve(demographic)?;
        let id = self.particles.spawn(position, profile);
        self.stats.record_created(demographic);
        Ok(id)
    }

    /// Like [`add_particle`](Self::add_particle) with the demographic given
    /// by name (case-insensitive).
    pub fn add_particle_named(&mut self, position: Vec2, demographic: &str) -> SimResult<ParticleId> {
        let demographic: Demographic = demographic.parse()?;
        self.add_particle(position, demographic)
    }

    /// Add `count` particles around `position`, drawing each demographic in
    /// proportion to the registry and jittering each spawn point by up to
    /// `spawn_jitter / 2` per axis.
    pub fn add_particles_with_demographics(
        &mut self,
        position: Vec2,
        count:    usize,
    ) -> SimResult<Vec<ParticleId>> {
        let jitter = self.config.spawn_jitter;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let demographic = self
                .registry
                .sample(self.rng.unit())
                .ok_or_else(|| SimError::Config("demographic registry is empty".into()))?;
            let offset = Vec2::new(self.rng.centered(jitter), self.rng.centered(jitter));
            ids.push(self.add_particle(position + offset, demographic)?);
        }
        Ok(ids)
    }

    /// Assign every particle its nearest target outside of a tick, so a
    /// freshly built scene reports targets before the first step.
    pub fn assign_targets(&mut self) {
        targeting::assign_nearest(self.particles.as_mut_slice(), self.scene.targets());
    }

    /// Record the start timestamp.  Only the first call after construction
    /// or reset has an effect; returns the recorded stamp.
    pub fn start(&mut self) -> Duration {
        *self.started_at.get_or_insert_with(|| self.wall.now())
    }

    /// Clear particles, scene, death log, counters and timestamps, rewind
    /// the tick counter and reseed the spawn RNG.
    pub fn reset(&mut self) {
        tracing::debug!(
            tick = self.clock.current_tick.0,
            active = self.particles.len(),
            "resetting simulation"
        );
        self.particles.clear();
        self.scene.clear();
        self.deaths.reset();
        self.stats.reset();
        self.clock.rewind();
        self.rng.reseed();
        self.started_at = None;
        self.completed = None;
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Run one tick without an observer.
    pub fn step(&mut self) -> TickReport {
        self.step_observed(&mut NoopObserver)
    }

    /// Run one tick, reporting to `observer`.
    pub fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let report = self.process_tick(now, observer);
        observer.on_tick_end(&report, &self.stats);
        if self.snapshot_interval > 0 && now.0.is_multiple_of(self.snapshot_interval) {
            observer.on_snapshot(now, self.particles.as_slice());
        }
        report
    }

    /// Run exactly `n` ticks.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step_observed(observer);
        }
    }

    /// Run until every particle has arrived or died, or `max_ticks` ticks
    /// have run.  Returns the completion tick if completion was reached.
    pub fn run_until_complete<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> Option<Tick> {
        let mut ran = 0;
        while self.completed.is_none() && ran < max_ticks {
            self.step_observed(observer);
            ran += 1;
        }
        observer.on_sim_end(self.clock.current_tick);
        self.completed_tick()
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> TickReport {
        let dt = self.clock.dt;

        // ── ① Contacts and escape velocities ──────────────────────────────
        contact::resolve(self.particles.as_mut_slice(), self.scene.boundaries());

        // ── ② Radii ───────────────────────────────────────────────────────
        radius::adjust(self.particles.as_mut_slice(), self.config.tau, dt);

        // ── ③ Stress, death, purge ────────────────────────────────────────
        stress::accrue(self.particles.as_mut_slice(), self.config.stress_rate, dt);
        let logged = self.deaths.len();
        let deaths = stress::purge(&mut self.particles, &mut self.deaths, &mut self.stats, now);
        if deaths > 0 {
            tracing::debug!(tick = now.0, deaths, "crushed particles removed");
            for marker in self.deaths.since(logged) {
                observer.on_death(now, marker);
            }
        }

        // ── ④ Targets ─────────────────────────────────────────────────────
        targeting::assign_nearest(self.particles.as_mut_slice(), self.scene.targets());

        // ── ⑤ Desired velocities ──────────────────────────────────────────
        velocity::plan(self.particles.as_mut_slice(), self.scene.targets(), self.config.beta);

        // ── ⑥ Integration ─────────────────────────────────────────────────
        integrate::advance(self.particles.as_mut_slice(), dt);

        // ── ⑦ Arrivals ────────────────────────────────────────────────────
        let arrivals = arrival::purge(
            &mut self.particles,
            self.scene.targets(),
            self.config.arrival_radius,
            &mut self.stats,
        );
        if arrivals > 0 {
            tracing::debug!(tick = now.0, arrivals, "particles reached their targets");
        }
        self.latch_completion(now, observer);

        self.clock.advance();
        let report = TickReport {
            tick: now,
            sim_time_secs: self.clock.elapsed_secs(),
            deaths,
            arrivals,
            active: self.particles.len(),
        };
        tracing::trace!(?report, "tick complete");
        report
    }

    /// Stamp completion the first time every created particle is accounted
    /// for as arrived or dead.  Stays latched until [`reset`](Self::reset).
    fn latch_completion<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        if self.completed.is_some() || !self.stats.total().is_drained() {
            return;
        }
        let at = self.wall.now();
        self.completed = Some((now, at));
        let total = self.stats.total();
        tracing::info!(
            tick = now.0,
            reached = total.reached_target,
            died = total.died,
            "all particles reached a target or died"
        );
        observer.on_complete(now, at);
    }

    // ── Read-only views ───────────────────────────────────────────────────

    /// Active particles in creation order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    #[inline]
    pub fn boundaries(&self) -> &[Boundary] {
        self.scene.boundaries()
    }

    #[inline]
    pub fn targets(&self) -> &[Target] {
        self.scene.targets()
    }

    /// Every death since construction or the last reset, oldest first.
    #[inline]
    pub fn death_markers(&self) -> &[DeathMarker] {
        self.deaths.as_slice()
    }

    #[inline]
    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    /// The fixed time step (s).
    #[inline]
    pub fn dt(&self) -> f64 {
        self.clock.dt
    }

    /// The tick the next `step` will run.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn sim_time_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn registry(&self) -> &DemographicRegistry {
        &self.registry
    }

    pub fn wall_clock(&self) -> &C {
        &self.wall
    }

    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<Duration> {
        self.completed.map(|(_, at)| at)
    }

    pub fn completed_tick(&self) -> Option<Tick> {
        self.completed.map(|(tick, _)| tick)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed.is_some()
    }

    /// Wall time from start to completion, or to now while still running.
    /// `None` before [`start`](Self::start).
    pub fn elapsed(&self) -> Option<Duration> {
        let start = self.started_at?;
        let end = self.completed_at().unwrap_or_else(|| self.wall.now());
        Some(end.saturating_sub(start))
    }
}
