//! Fluent builder for constructing a [`Sim`].

use cpm_core::{Clock, DemographicRegistry, ModelConfig, MonotonicClock, SimClock, SimRng};
use cpm_entity::{DeathLog, ParticleStore, PopulationStats, Scene};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<C>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                   |
/// |--------------------------|-------------------------------------------|
/// | `.registry(r)`           | `config.registry()`                       |
/// | `.clock(c)`              | `MonotonicClock::new()`                   |
/// | `.snapshot_interval(n)`  | `0` (no `on_snapshot` calls)              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(ModelConfig::default())
///     .registry(DemographicRegistry::standard())
///     .build()?;
/// let exit = sim.add_target(Vec2::new(17.0, 3.0));
/// sim.add_particles_with_demographics(Vec2::new(5.0, 5.0), 5)?;
/// sim.run_until_complete(100_000, &mut NoopObserver);
/// ```
pub struct SimBuilder<C: Clock = MonotonicClock> {
    config:            ModelConfig,
    registry:          Option<DemographicRegistry>,
    clock:             C,
    snapshot_interval: u64,
}

impl SimBuilder<MonotonicClock> {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            registry:          None,
            clock:             MonotonicClock::new(),
            snapshot_interval: 0,
        }
    }
}

impl<C: Clock> SimBuilder<C> {
    /// Use `registry` instead of the one described by the config.
    pub fn registry(mut self, registry: DemographicRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the wall clock used for start/completion stamps.
    pub fn clock<C2: Clock>(self, clock: C2) -> SimBuilder<C2> {
        SimBuilder {
            config:            self.config,
            registry:          self.registry,
            clock,
            snapshot_interval: self.snapshot_interval,
        }
    }

    /// Call `SimObserver::on_snapshot` every `n` ticks (0 disables).
    pub fn snapshot_interval(mut self, n: u64) -> Self {
        self.snapshot_interval = n;
        self
    }

    /// Validate inputs, fix the time step, and return an empty [`Sim`].
    pub fn build(self) -> SimResult<Sim<C>> {
        self.config.validate()?;
        let registry = self.registry.unwrap_or_else(|| self.config.registry());
        registry.validate()?;
        let dt = self.config.time_step(&registry)?;

        tracing::info!(
            dt,
            demographics = registry.len(),
            seed = self.config.seed,
            "contractile particle model ready"
        );

        Ok(Sim {
            clock:             SimClock::new(dt),
            rng:               SimRng::new(self.config.seed),
            stats:             PopulationStats::new(&registry),
            particles:         ParticleStore::new(),
            scene:             Scene::new(),
            deaths:            DeathLog::new(),
            wall:              self.clock,
            snapshot_interval: self.snapshot_interval,
            started_at:        None,
            completed:         None,
            config:            self.config,
            registry,
        })
    }
}
