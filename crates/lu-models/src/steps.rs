//! Annual steps that replace the network state of the travel-time provider.

use tracing::info;

use lu_travel::{SkimSource, TransportModel};

use crate::{AnnualModel, ModelContext, ModelResult};

/// Loads the network state for the year from a [`SkimSource`] and pushes it
/// into the provider, invalidating every cached skim.
pub struct SkimRefresh {
    source: Box<dyn SkimSource>,
}

impl SkimRefresh {
    pub fn new(source: Box<dyn SkimSource>) -> Self {
        Self { source }
    }
}

impl AnnualModel for SkimRefresh {
    fn name(&self) -> &str {
        "skim_refresh"
    }

    fn run(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        let current = ctx.travel.network_state();
        let state = self.source.state_for_year(ctx.year, &current)?;
        ctx.travel.update(state)?;
        info!(year = %ctx.year, "skims refreshed");
        Ok(())
    }
}

/// Runs the external transport model and adopts the congested network it
/// returns.  Blocking; failures are fatal.
///
/// With `run_at_setup`, the model also runs once for the start year during
/// setup, before the first accessibility pass.
pub struct TransportStep {
    model:        Box<dyn TransportModel>,
    run_at_setup: bool,
}

impl TransportStep {
    pub fn new(model: Box<dyn TransportModel>) -> Self {
        Self { model, run_at_setup: false }
    }

    pub fn run_at_setup(mut self, yes: bool) -> Self {
        self.run_at_setup = yes;
        self
    }
}

impl AnnualModel for TransportStep {
    fn name(&self) -> &str {
        "transport_model"
    }

    fn setup(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        if self.run_at_setup {
            self.run(ctx)?;
        }
        Ok(())
    }

    fn run(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        let state = self.model.run(ctx.year, ctx.data, ctx.travel)?;
        ctx.travel.update(state)?;
        info!(year = %ctx.year, "transport model finished");
        Ok(())
    }
}
