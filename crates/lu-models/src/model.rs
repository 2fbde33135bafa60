//! Model traits — the extension points of the simulation.
//!
//! | Trait               | Called                                           |
//! |---------------------|--------------------------------------------------|
//! | [`EventModel`]      | every year: generate events, apply them, finish  |
//! | [`AnnualModel`]     | once per year in registration order              |
//! | [`CarOwnershipModel`] | every year on the households updated that year |
//! | [`PopulationScaler`] | in scaling years, against control totals        |
//!
//! All traits are `Send` so a configured model can be moved to the thread
//! driving the run.  Models receive the RNG through [`ModelContext`] or as
//! an argument and never own a random source, so a run is reproducible from
//! its seed.

use lu_core::{HouseholdId, SimRng, Year};
use lu_data::DataContainer;

use crate::{Event, ModelContext, ModelResult};

/// Year-level counters handed to [`EventModel::finish_year`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct YearCounters {
    /// Households whose car count changed this year.
    pub car_changes: u64,
    /// Households that switched a car to an autonomous vehicle.
    pub av_switches: u64,
}

/// Handler for one micro-event type.
///
/// # Example
///
/// ```rust,ignore
/// struct Aging;
///
/// impl EventModel for Aging {
///     fn prepare_year(&mut self, _y: Year, data: &DataContainer, _rng: &mut SimRng)
///         -> ModelResult<Vec<Event>>
///     {
///         Ok(data.persons.iter().map(|p| Event::person(EventType::Birthday, p.id)).collect())
///     }
///
///     fn apply(&mut self, event: &Event, ctx: &mut ModelContext<'_>) -> ModelResult<bool> {
///         let EventTarget::Person(id) = event.target else { return Ok(false) };
///         ctx.data.persons.get_mut(id)?.age += 1;
///         Ok(true)
///     }
/// }
/// ```
pub trait EventModel: Send {
    /// Candidate events for `year`, generated from a read-only view of the
    /// population.  The list is applied in order.
    fn prepare_year(
        &mut self,
        year: Year,
        data: &DataContainer,
        rng:  &mut SimRng,
    ) -> ModelResult<Vec<Event>>;

    /// Apply one event.  Returns `true` if the event changed state; `false`
    /// when it no longer applied (its target is gone, no alternative was
    /// available).  An `Err` aborts the year.
    fn apply(&mut self, event: &Event, ctx: &mut ModelContext<'_>) -> ModelResult<bool>;

    /// Year-end bookkeeping once every event type has been applied.
    fn finish_year(
        &mut self,
        _year:     Year,
        _counters: &YearCounters,
        _data:     &DataContainer,
    ) -> ModelResult<()> {
        Ok(())
    }
}

/// A whole-year update step.
pub trait AnnualModel: Send {
    /// Label used in logs and timers.
    fn name(&self) -> &str;

    /// Called once before the first simulated year.
    fn setup(&mut self, _ctx: &mut ModelContext<'_>) -> ModelResult<()> {
        Ok(())
    }

    fn run(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<()>;
}

/// Vehicle-fleet update for a set of households.
pub trait CarOwnershipModel: Send {
    fn name(&self) -> &str;

    /// Update `households` and return how many changed.
    fn update(&mut self, households: &[HouseholdId], ctx: &mut ModelContext<'_>) -> ModelResult<u64>;
}

/// What a rescale did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScalingReport {
    pub added:   u64,
    pub removed: u64,
}

/// Rescales the population to exogenous control totals.
pub trait PopulationScaler: Send {
    fn scale(&mut self, ctx: &mut ModelContext<'_>) -> ModelResult<ScalingReport>;
}
