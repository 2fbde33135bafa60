//! Mutable state lent to every model call.

use lu_core::{Issues, SimRng, Year};
use lu_data::DataContainer;
use lu_travel::TravelTimes;

/// Everything a model may read or change while it runs.
///
/// Built by the orchestrator for each step and dropped when the step
/// returns.  The population store is borrowed exclusively, so at most one
/// model mutates it at a time.
pub struct ModelContext<'a> {
    /// The simulated year the step belongs to.
    pub year:   Year,
    pub data:   &'a mut DataContainer,
    pub travel: &'a dyn TravelTimes,
    /// Soft diagnostics for the current period.
    pub issues: &'a mut Issues,
    pub rng:    &'a mut SimRng,
}

impl<'a> ModelContext<'a> {
    #[inline]
    pub fn new(
        year:   Year,
        data:   &'a mut DataContainer,
        travel: &'a dyn TravelTimes,
        issues: &'a mut Issues,
        rng:    &'a mut SimRng,
    ) -> Self {
        Self { year, data, travel, issues, rng }
    }
}
