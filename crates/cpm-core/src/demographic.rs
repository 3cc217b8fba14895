//! Population subgroups and their physical/behavioral constants.
//!
//! The set of demographics is closed (`Youth`, `Adult`, `Elderly`).  A model
//! carries a [`DemographicRegistry`] listing the profiles it uses, in
//! insertion order; that order is the slicing order for proportional
//! sampling and the display order for per-group statistics.
//!
//! A profile is resolved once when a particle is created and copied into
//! it, so particles never look up or share profile data during a tick.

use std::fmt;
use std::str::FromStr;

use crate::{CpmError, CpmResult};

// ── Demographic ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Demographic {
    Youth,
    #[default]
    Adult,
    Elderly,
}

impl Demographic {
    pub const ALL: [Demographic; 3] = [Demographic::Youth, Demographic::Adult, Demographic::Elderly];

    pub fn name(self) -> &'static str {
        match self {
            Demographic::Youth   => "Youth",
            Demographic::Adult   => "Adult",
            Demographic::Elderly => "Elderly",
        }
    }
}

impl fmt::Display for Demographic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Demographic {
    type Err = CpmError;

    /// Case-insensitive: `"youth"`, `"Youth"` and `"YOUTH"` all parse.
    fn from_str(s: &str) -> CpmResult<Self> {
        Demographic::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CpmError::UnknownDemographic(s.to_owned()))
    }
}

// ── Rgb ───────────────────────────────────────────────────────────────────────

/// Display colour of a demographic, for renderers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> CpmResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(CpmError::Parse(format!("invalid colour '{s}'")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CpmError::Parse(format!("invalid colour '{s}'")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = CpmError;
    fn try_from(s: String) -> CpmResult<Self> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> String {
        c.to_string()
    }
}

// ── DemographicProfile ────────────────────────────────────────────────────────

/// Immutable parameter bundle for one demographic.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemographicProfile {
    pub demographic: Demographic,
    /// Fully compressed radius (m).
    pub r_min: f64,
    /// Relaxed radius (m).
    pub r_max: f64,
    /// Maximum desired speed (m/s); also the escape speed.
    pub vd_max: f64,
    /// Accumulated stress at which the particle dies.
    pub stress_threshold: f64,
    /// Simultaneous contacts at which stress starts accruing.
    pub crush_threshold: u32,
    /// Share of the population drawn from this group, in `[0, 1]`.
    pub proportion: f64,
    pub color: Rgb,
}

impl DemographicProfile {
    pub fn youth() -> Self {
        Self {
            demographic:      Demographic::Youth,
            r_min:            0.15,
            r_max:            0.6,
            vd_max:           2.0,
            stress_threshold: 2.0,
            crush_threshold:  2,
            proportion:       0.2,
            color:            Rgb::new(0x4C, 0xAF, 0x50),
        }
    }

    pub fn adult() -> Self {
        Self {
            demographic:      Demographic::Adult,
            r_min:            0.2,
            r_max:            0.8,
            vd_max:           1.5,
            stress_threshold: 3.0,
            crush_threshold:  4,
            proportion:       0.6,
            color:            Rgb::new(0x21, 0x96, 0xF3),
        }
    }

    pub fn elderly() -> Self {
        Self {
            demographic:      Demographic::Elderly,
            r_min:            0.18,
            r_max:            0.75,
            vd_max:           0.8,
            stress_threshold: 2.0,
            crush_threshold:  2,
            proportion:       0.2,
            color:            Rgb::new(0xFF, 0x98, 0x00),
        }
    }

    /// Check the physical constraints every tick phase relies on.
    pub fn validate(&self) -> CpmResult<()> {
        let d = self.demographic;
        if !(self.r_min > 0.0 && self.r_min < self.r_max) {
            return Err(CpmError::Config(format!(
                "{d}: need 0 < r_min < r_max (got r_min={}, r_max={})",
                self.r_min, self.r_max
            )));
        }
        if !(self.vd_max > 0.0) {
            return Err(CpmError::Config(format!("{d}: vd_max must be positive (got {})", self.vd_max)));
        }
        if !(self.stress_threshold >= 0.0) {
            return Err(CpmError::Config(format!(
                "{d}: stress_threshold must be non-negative (got {})",
                self.stress_threshold
            )));
        }
        if !(self.proportion >= 0.0) {
            return Err(CpmError::Config(format!(
                "{d}: proportion must be non-negative (got {})",
                self.proportion
            )));
        }
        Ok(())
    }
}

// ── DemographicRegistry ───────────────────────────────────────────────────────

/// Ordered set of profiles available to a model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemographicRegistry {
    profiles: Vec<DemographicProfile>,
}

impl DemographicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Youth 20 %, Adult 60 %, Elderly 20 %.
    pub fn standard() -> Self {
        Self {
            profiles: vec![
                DemographicProfile::youth(),
                DemographicProfile::adult(),
                DemographicProfile::elderly(),
            ],
        }
    }

    /// A registry holding one profile.
    pub fn single(profile: DemographicProfile) -> Self {
        Self { profiles: vec![profile] }
    }

    /// Add `profile`, replacing an existing entry for the same demographic
    /// in place so the registry order is unchanged.
    pub fn insert(&mut self, profile: DemographicProfile) {
        match self.profiles.iter_mut().find(|p| p.demographic == profile.demographic) {
            Some(slot) => *slot = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, demographic: Demographic) -> Option<&DemographicProfile> {
        self.profiles.iter().find(|p| p.demographic == demographic)
    }

    /// Copy out the profile for `demographic`, or fail if it is not registered.
    pub fn resolve(&self, demographic: Demographic) -> CpmResult<DemographicProfile> {
        self.get(demographic)
            .copied()
            .ok_or(CpmError::UnregisteredDemographic(demographic))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DemographicProfile> {
        self.profiles.iter()
    }

    pub fn demographics(&self) -> impl Iterator<Item = Demographic> + '_ {
        self.profiles.iter().map(|p| p.demographic)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Smallest `r_min` over all profiles.
    pub fn min_r_min(&self) -> Option<f64> {
        self.profiles.iter().map(|p| p.r_min).reduce(f64::min)
    }

    /// Largest `vd_max` over all profiles.
    pub fn max_vd_max(&self) -> Option<f64> {
        self.profiles.iter().map(|p| p.vd_max).reduce(f64::max)
    }

    /// Pick a demographic for a uniform draw `u ∈ [0, 1)`.
    ///
    /// The unit interval is sliced by cumulative proportion in registry order;
    /// the first entry whose cumulative share reaches `u` wins.  Draws beyond
    /// the total share (proportions summing below 1) fall to the last entry.
    pub fn sample(&self, u: f64) -> Option<Demographic> {
        let mut cumulative = 0.0;
        for p in &self.profiles {
            cumulative += p.proportion;
            if u <= cumulative {
                return Some(p.demographic);
            }
        }
        self.profiles.last().map(|p| p.demographic)
    }

    /// Validate every profile and require at least one.
    pub fn validate(&self) -> CpmResult<()> {
        if self.profiles.is_empty() {
            return Err(CpmError::Config("demographic registry is empty".into()));
        }
        self.profiles.iter().try_for_each(DemographicProfile::validate)
    }
}

impl FromIterator<DemographicProfile> for DemographicRegistry {
    fn from_iter<I: IntoIterator<Item = DemographicProfile>>(iter: I) -> Self {
        let mut registry = DemographicRegistry::new();
        for profile in iter {
            registry.insert(profile);
        }
        registry
    }
}
