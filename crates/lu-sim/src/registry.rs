//! Annual model registry with year gates.

use std::time::Instant;

use tracing::debug;

use lu_core::{RunConfig, Year, YearSet};
use lu_models::{AnnualModel, ModelContext};

use crate::{SimResult, TimeTracker};

/// When a registered annual model runs.  Gates are set-membership tests
/// against configuration data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Every simulated year.
    Always,
    /// Every year except the base year.
    SkipBaseYear,
    /// Only the listed years.
    Years(YearSet),
    /// The listed years, except the run's start year.
    YearsExceptStart(YearSet),
}

impl Gate {
    pub fn is_open(&self, year: Year, config: &RunConfig) -> bool {
        match self {
            Gate::Always                  => true,
            Gate::SkipBaseYear            => !config.is_base_year(year),
            Gate::Years(years)            => years.contains(&year),
            Gate::YearsExceptStart(years) => years.contains(&year) && year != config.start_year,
        }
    }
}

struct Entry {
    model: Box<dyn AnnualModel>,
    gate:  Gate,
}

/// Annual models in registration order.  Later models see the state left by
/// earlier ones; the first error aborts the year.
#[derive(Default)]
pub struct AnnualModelRegistry {
    entries: Vec<Entry>,
}

impl AnnualModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: Box<dyn AnnualModel>, gate: Gate) {
        self.entries.push(Entry { model, gate });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.model.name()).collect()
    }

    /// Call every model's `setup`, ungated.
    pub fn setup_all(&mut self, ctx: &mut ModelContext<'_>) -> SimResult<()> {
        for entry in &mut self.entries {
            entry.model.setup(ctx)?;
        }
        Ok(())
    }

    /// Run every model whose gate is open for `ctx.year`.  Returns the number
    /// of models that ran.
    pub fn run_all(
        &mut self,
        ctx:    &mut ModelContext<'_>,
        config: &RunConfig,
        timers: &mut TimeTracker,
    ) -> SimResult<usize> {
        let mut ran = 0;
        for entry in &mut self.entries {
            if !entry.gate.is_open(ctx.year, config) {
                continue;
            }
            let started = Instant::now();
            entry.model.run(ctx)?;
            timers.record(entry.model.name(), started.elapsed());
            debug!(year = %ctx.year, model = entry.model.name(), "annual model finished");
            ran += 1;
        }
        Ok(ran)
    }
}
