//! Population counters.
//!
//! Every particle is counted once as created and stays in `current` until
//! it either reaches a target or dies, so at all times
//!
//!   created == current + reached_target + died
//!
//! holds for the global tally and for each demographic separately.

use cpm_core::{Demographic, DemographicRegistry};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counters {
    pub created: u64,
    pub current: u64,
    pub reached_target: u64,
    pub died: u64,
}

impl Counters {
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.created == self.current + self.reached_target + self.died
    }

    /// Every created particle has left the arena one way or the other.
    #[inline]
    pub fn is_drained(&self) -> bool {
        self.created > 0 && self.reached_target + self.died == self.created
    }

    fn spawned(&mut self) {
        self.created += 1;
        self.current += 1;
    }

    fn arrived(&mut self) {
        self.current -= 1;
        self.reached_target += 1;
    }

    fn perished(&mut self) {
        self.current -= 1;
        self.died += 1;
    }
}

/// Global counters plus one [`Counters`] per registered demographic, kept
/// in registry order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopulationStats {
    total: Counters,
    by_demographic: Vec<(Demographic, Counters)>,
}

impl PopulationStats {
    pub fn new(registry: &DemographicRegistry) -> Self {
        Self {
            total:          Counters::default(),
            by_demographic: registry.demographics().map(|d| (d, Counters::default())).collect(),
        }
    }

    #[inline]
    pub fn total(&self) -> &Counters {
        &self.total
    }

    pub fn demographic(&self, demographic: Demographic) -> Option<&Counters> {
        self.by_demographic
            .iter()
            .find(|(d, _)| *d == demographic)
            .map(|(_, c)| c)
    }

    /// Per-demographic counters in registry order.
    pub fn by_demographic(&self) -> &[(Demographic, Counters)] {
        &self.by_demographic
    }

    pub fn record_created(&mut self, demographic: Demographic) {
        self.total.spawned();
        self.slot(demographic).spawned();
    }

    pub fn record_arrival(&mut self, demographic: Demographic) {
        self.total.arrived();
        self.slot(demographic).arrived();
    }

    pub fn record_death(&mut self, demographic: Demographic) {
        self.total.perished();
        self.slot(demographic).perished();
    }

    /// The balance identity holds globally and for every demographic.
    pub fn is_balanced(&self) -> bool {
        self.total.is_balanced() && self.by_demographic.iter().all(|(_, c)| c.is_balanced())
    }

    /// Zero every counter, keeping the demographic rows.
    pub fn reset(&mut self) {
        self.total = Counters::default();
        for (_, c) in &mut self.by_demographic {
            *c = Counters::default();
        }
    }

    fn slot(&mut self, demographic: Demographic) -> &mut Counters {
        match self.by_demographic.iter().position(|(d, _)| *d == demographic) {
            Some(i) => &mut self.by_demographic[i].1,
            None => {
                self.by_demographic.push((demographic, Counters::default()));
                let last = self.by_demographic.len() - 1;
                &mut self.by_demographic[last].1
            }
        }
    }
}
