//! Household relocation.

use lu_core::{DwellingId, HouseholdId, IssueKind, SimRng, Year};
use lu_data::DataContainer;

use crate::choice::choose_weighted;
use crate::{Event, EventModel, EventType, ModelContext, ModelResult};

/// Households move with probability `move_rate`; households without a
/// dwelling always search.
///
/// A mover considers vacant dwellings whose monthly price is at most
/// `max_rent_share` of monthly household income, weighted by
/// `(1 + zone car accessibility) · (1 + quality)`.
#[derive(Debug)]
pub struct RelocationModel {
    pub move_rate:      f64,
    pub max_rent_share: f64,
}

impl Default for RelocationModel {
    fn default() -> Self {
        Self { move_rate: 0.08, max_rent_share: 0.4 }
    }
}

impl RelocationModel {
    fn candidates(
        &self,
        household: HouseholdId,
        data: &DataContainer,
    ) -> ModelResult<(Vec<DwellingId>, Vec<f64>, usize)> {
        let current = data.households.get(household)?.dwelling;
        let budget = data.household_income(household)? / 12.0 * self.max_rent_share;
        let mut ids = Vec::new();
        let mut weights = Vec::new();
        let mut vacant = 0;
        for d in data.dwellings.iter().filter(|d| d.is_vacant() && Some(d.id) != current) {
            vacant += 1;
            if d.price > budget {
                continue;
            }
            let accessibility = data.geography.zones.get(d.zone)?.car_accessibility;
            ids.push(d.id);
            weights.push((1.0 + accessibility) * (1.0 + d.quality as f64));
        }
        Ok((ids, weights, vacant))
    }
}

impl EventModel for RelocationModel {
    fn prepare_year(&mut self, _: Year, data: &DataContainer, rng: &mut SimRng) -> ModelResult<Vec<Event>> {
        let mut events = Vec::new();
        for hh in data.households.iter() {
            if hh.dwelling.is_none() || rng.gen_bool(self.move_rate) {
                events.push(Event::household(EventType::Relocation, hh.id));
            }
        }
        Ok(events)
    }

    fn apply(&mut self, event: &Event, ctx: &mut ModelContext<'_>) -> ModelResult<bool> {
        let id = event.expect_household()?;
        if !ctx.data.households.contains(id) {
            ctx.issues.increment(IssueKind::MissingRecord, id);
            return Ok(false);
        }
        let (ids, weights, vacant) = self.candidates(id, ctx.data)?;
        if vacant == 0 {
            ctx.issues.increment(IssueKind::NoVacantDwelling, id);
            return Ok(false);
        }
        let Some(pick) = choose_weighted(ctx.rng, &weights) else {
            ctx.issues.increment(IssueKind::ZeroProbability, format!("no affordable dwelling for {id}"));
            return Ok(false);
        };
        ctx.data.move_household(id, ids[pick])?;
        Ok(true)
    }
}
