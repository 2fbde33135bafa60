//! Aging, births and deaths.

use tracing::debug;

use lu_core::{IssueKind, SimRng, Year};
use lu_data::{DataContainer, Person, Role, Sex};

use crate::{Event, EventModel, EventType, ModelContext, ModelResult, YearCounters};

// ── Birthday ──────────────────────────────────────────────────────────────────

/// Every person ages by one year.
#[derive(Debug, Default)]
pub struct BirthdayModel {
    aged: u64,
}

impl EventModel for BirthdayModel {
    fn prepare_year(&mut self, _: Year, data: &DataContainer, _: &mut SimRng) -> ModelResult<Vec<Event>> {
        self.aged = 0;
        Ok(data.persons.iter().map(|p| Event::person(EventType::Birthday, p.id)).collect())
    }

    fn apply(&mut self, event: &Event, ctx: &mut ModelContext<'_>) -> ModelResult<bool> {
        let id = event.expect_person()?;
        let Ok(person) = ctx.data.persons.get_mut(id) else {
            ctx.issues.increment(IssueKind::MissingRecord, id);
            return Ok(false);
        };
        person.age += 1;
        self.aged += 1;
        Ok(true)
    }

    fn finish_year(&mut self, year: Year, _: &YearCounters, _: &DataContainer) -> ModelResult<()> {
        debug!(%year, aged = self.aged, "birthdays applied");
        Ok(())
    }
}

// ── Birth ─────────────────────────────────────────────────────────────────────

/// Women of child-bearing age give birth with a fixed annual probability.
/// The child joins the mother's household.
#[derive(Debug)]
pub struct BirthModel {
    pub rate:    f64,
    pub min_age: u32,
    pub max_age: u32,
}

impl Default for BirthModel {
    fn default() -> Self {
        Self { rate: 0.04, min_age: 18, max_age: 45 }
    }
}

impl EventModel for BirthModel {
    fn prepare_year(&mut self, _: Year, data: &DataContainer, rng: &mut SimRng) -> ModelResult<Vec<Event>> {
        let mut events = Vec::new();
        for p in data.persons.iter() {
            let eligible = p.sex == Sex::Female && (self.min_age..=self.max_age).contains(&p.age);
            if eligible && rng.gen_bool(self.rate) {
                events.push(Event::person(EventType::Birth, p.id));
            }
        }
        Ok(events)
    }

    fn apply(&mut self, event: &Event, ctx: &mut ModelContext<'_>) -> ModelResult<bool> {
        let mother = event.expect_person()?;
        let Some(household) = ctx.data.persons.try_get(mother).map(|p| p.household) else {
            ctx.issues.increment(IssueKind::MissingRecord, mother);
            return Ok(false);
        };
        let sex = if ctx.rng.gen_bool(0.5) { Sex::Female } else { Sex::Male };
        let child = Person::new(ctx.data.persons.next_id(), household, 0, sex, Role::Child);
        ctx.data.add_person(child)?;
        ctx.data.households.mark_updated(household)?;
        Ok(true)
    }
}

// ── Death ─────────────────────────────────────────────────────────────────────

/// Gompertz mortality: `p(age) = a · e^(b · age)`, capped at 1.
///
/// A surviving spouse becomes single; a household left without members is
/// dissolved and its dwelling vacated.
#[derive(Debug)]
pub struct DeathModel {
    pub a: f64,
    pub b: f64,
}

impl Default for DeathModel {
    fn default() -> Self {
        Self { a: 5.0e-5, b: 0.09 }
    }
}

impl DeathModel {
    pub fn probability(&self, age: u32) -> f64 {
        (self.a * (self.b * age as f64).exp()).min(1.0)
    }
}

impl EventModel for DeathModel {
    fn prepare_year(&mut self, _: Year, data: &DataContainer, rng: &mut SimRng) -> ModelResult<Vec<Event>> {
        let mut events = Vec::new();
        for p in data.persons.iter() {
            if rng.gen_bool(self.probability(p.age)) {
                events.push(Event::person(EventType::Death, p.id));
            }
        }
        Ok(events)
    }

    fn apply(&mut self, event: &Event, ctx: &mut ModelContext<'_>) -> ModelResult<bool> {
        let id = event.expect_person()?;
        let Some(person) = ctx.data.persons.try_get(id) else {
            ctx.issues.increment(IssueKind::MissingRecord, id);
            return Ok(false);
        };
        let household = person.household;
        let widowed = person.role == Role::Married;

        ctx.data.remove_person(id)?;
        let remaining = ctx.data.households.get(household)?.members.clone();
        if remaining.is_empty() {
            ctx.data.dissolve_household(household)?;
        } else if widowed {
            for m in remaining {
                let p = ctx.data.persons.get_mut(m)?;
                if p.role == Role::Married {
                    p.role = Role::Single;
                }
            }
        }
        Ok(true)
    }
}
