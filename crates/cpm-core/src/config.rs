//! Construction-time model configuration.

use crate::{CpmError, CpmResult, Demographic, DemographicProfile, DemographicRegistry, Rgb};

/// Top-level model configuration.
///
/// Typically built in code or loaded from a JSON file by the application
/// crate (with the `serde` feature) and handed to the simulation builder.
/// Missing fields in a config file take the defaults below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    /// Compressed radius (m) of the fallback single-group population.
    pub r_min: f64,

    /// Relaxed radius (m) of the fallback single-group population.
    pub r_max: f64,

    /// Maximum desired speed (m/s) of the fallback population.  Also the
    /// escape-speed bound that enters the time step.
    pub vd_max: f64,

    /// Exponent of the radius–speed law.
    pub beta: f64,

    /// Time (s) for a fully compressed particle to regrow to `r_max`.
    pub tau: f64,

    /// Stress gained per second while crushed.
    pub stress_rate: f64,

    /// Stress threshold of the fallback population.
    pub stress_threshold: f64,

    /// Crush threshold (contacts) of the fallback population.
    pub crush_threshold: u32,

    /// A particle within this distance (m) of its target has arrived.
    pub arrival_radius: f64,

    /// Width (m) of the uniform spawn jitter applied per axis by
    /// proportional population spawning.
    pub spawn_jitter: f64,

    /// Master RNG seed.  The same seed always spawns the same population.
    pub seed: u64,

    /// Demographic registry in sampling order.  Empty ⇒ a single Adult
    /// group built from the scalar fields above.
    pub demographics: Vec<DemographicProfile>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            r_min:            0.2,
            r_max:            0.8,
            vd_max:           1.5,
            beta:             1.0,
            tau:              0.5,
            stress_rate:      2.0,
            stress_threshold: 8.0,
            crush_threshold:  3,
            arrival_radius:   0.5,
            spawn_jitter:     0.5,
            seed:             42,
            demographics:     Vec::new(),
        }
    }
}

impl ModelConfig {
    /// The profile used when no demographic registry is configured.
    pub fn fallback_profile(&self) -> DemographicProfile {
        DemographicProfile {
            demographic:      Demographic::Adult,
            r_min:            self.r_min,
            r_max:            self.r_max,
            vd_max:           self.vd_max,
            stress_threshold: self.stress_threshold,
            crush_threshold:  self.crush_threshold,
            proportion:       1.0,
            color:            Rgb::new(0x21, 0x96, 0xF3),
        }
    }

    /// Registry described by this config.
    pub fn registry(&self) -> DemographicRegistry {
        if self.demographics.is_empty() {
            DemographicRegistry::single(self.fallback_profile())
        } else {
            self.demographics.iter().copied().collect()
        }
    }

    /// Upper bound on escape speed.
    #[inline]
    pub fn escape_speed_bound(&self) -> f64 {
        self.vd_max
    }

    /// Fixed time step for `registry`:
    ///
    ///   dt = min(r_min) / (2 · max(max(vd_max), escape_speed_bound))
    ///
    /// No particle can travel more than half the smallest radius in one step,
    /// so two particles closing head-on cannot pass through each other.
    pub fn time_step(&self, registry: &DemographicRegistry) -> CpmResult<f64> {
        let r_min = registry
            .min_r_min()
            .ok_or_else(|| CpmError::Config("demographic registry is empty".into()))?;
        let speed = registry
            .max_vd_max()
            .map_or(self.escape_speed_bound(), |v| v.max(self.escape_speed_bound()));
        if !(speed > 0.0) {
            return Err(CpmError::Config(format!("maximum speed must be positive (got {speed})")));
        }
        Ok(r_min / (2.0 * speed))
    }

    /// Check the model-wide scalar parameters.
    pub fn validate(&self) -> CpmResult<()> {
        if !(self.tau > 0.0) {
            return Err(CpmError::Config(format!("tau must be positive (got {})", self.tau)));
        }
        if !(self.beta >= 0.0) {
            return Err(CpmError::Config(format!("beta must be non-negative (got {})", self.beta)));
        }
        if !(self.stress_rate >= 0.0) {
            return Err(CpmError::Config(format!(
                "stress_rate must be non-negative (got {})",
                self.stress_rate
            )));
        }
        if !(self.arrival_radius >= 0.0) {
            return Err(CpmError::Config(format!(
                "arrival_radius must be non-negative (got {})",
                self.arrival_radius
            )));
        }
        if !(self.spawn_jitter >= 0.0) {
            return Err(CpmError::Config(format!(
                "spawn_jitter must be non-negative (got {})",
                self.spawn_jitter
            )));
        }
        Ok(())
    }
}
