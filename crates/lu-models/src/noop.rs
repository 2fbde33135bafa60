//! Models that do nothing.

use lu_core::{HouseholdId, SimRng, Year};
use lu_data::DataContainer;

use crate::{
    AnnualModel, CarOwnershipModel, Event, EventModel, ModelContext, ModelResult,
    PopulationScaler, ScalingReport,
};

/// Placeholder for any model slot: generates no events, changes nothing.
///
/// Useful in tests and for switching off a default step.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopModel;

impl EventModel for NoopModel {
    fn prepare_year(&mut self, _: Year, _: &DataContainer, _: &mut SimRng) -> ModelResult<Vec<Event>> {
        Ok(vec![])
    }

    fn apply(&mut self, _: &Event, _: &mut ModelContext<'_>) -> ModelResult<bool> {
        Ok(false)
    }
}

impl AnnualModel for NoopModel {
    fn name(&self) -> &str {
        "noop"
    }

    fn run(&mut self, _: &mut ModelContext<'_>) -> ModelResult<()> {
        Ok(())
    }
}

impl CarOwnershipModel for NoopModel {
    fn name(&self) -> &str {
        "noop"
    }

    fn update(&mut self, _: &[HouseholdId], _: &mut ModelContext<'_>) -> ModelResult<u64> {
        Ok(0)
    }
}

impl PopulationScaler for NoopModel {
    fn scale(&mut self, _: &mut ModelContext<'_>) -> ModelResult<ScalingReport> {
        Ok(ScalingReport::default())
    }
}
