//! Wall-clock accounting per step and per year.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::info;

use lu_core::Year;

/// Accumulated wall time.
///
/// Step times are summed across years under the step's name; year times are
/// recorded once per simulated year.
#[derive(Clone, Debug, Default)]
pub struct TimeTracker {
    steps: BTreeMap<String, Duration>,
    years: Vec<(Year, Duration)>,
}

impl TimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: &str, elapsed: Duration) {
        *self.steps.entry(step.to_owned()).or_default() += elapsed;
    }

    pub fn record_year(&mut self, year: Year, elapsed: Duration) {
        self.years.push((year, elapsed));
    }

    /// Total time spent in `step`; zero if it never ran.
    pub fn step(&self, step: &str) -> Duration {
        self.steps.get(step).copied().unwrap_or_default()
    }

    pub fn steps(&self) -> impl Iterator<Item = (&str, Duration)> + '_ {
        self.steps.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn years(&self) -> &[(Year, Duration)] {
        &self.years
    }

    pub fn total(&self) -> Duration {
        self.years.iter().map(|(_, d)| *d).sum()
    }

    pub fn log_report(&self) {
        for (step, elapsed) in &self.steps {
            info!(step = %step, secs = elapsed.as_secs_f64(), "step time");
        }
        info!(years = self.years.len(), secs = self.total().as_secs_f64(), "total simulation time");
    }
}
