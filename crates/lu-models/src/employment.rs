//! Job search and job loss.

use lu_core::{HouseholdId, IssueKind, Location, Mode, PersonId, SimRng, Year, ZoneId};
use lu_data::DataContainer;

use crate::choice::choose_weighted;
use crate::{Event, EventModel, EventType, ModelContext, ModelResult};

/// Departure time used for commute travel times: 08:00.
const COMMUTE_DEPARTURE_SECS: u32 = 8 * 3_600;

/// Employment transitions.
///
/// Employed persons quit with probability `quit_rate`; unemployed persons of
/// working age look for work with probability `search_rate`.  A searcher
/// picks a vacant job with weight `exp(-beta · commute minutes)` from their
/// home zone, by car at the morning peak.
#[derive(Debug)]
pub struct EmploymentModel {
    pub quit_rate:     f64,
    pub search_rate:   f64,
    pub beta:          f64,
    /// Income floor for a new hire.
    pub starting_wage: f64,
    /// Share of income kept after losing a job.
    pub replacement:   f64,
}

impl Default for EmploymentModel {
    fn default() -> Self {
        Self {
            quit_rate:     0.05,
            search_rate:   0.3,
            beta:          0.1,
            starting_wage: 24_000.0,
            replacement:   0.6,
        }
    }
}

impl EmploymentModel {
    fn home_zone(ctx: &ModelContext<'_>, household: HouseholdId) -> ModelResult<Option<ZoneId>> {
        let Some(dwelling) = ctx.data.households.get(household)?.dwelling else {
            return Ok(None);
        };
        Ok(Some(ctx.data.dwellings.get(dwelling)?.zone))
    }

    fn find_job(&self, person: PersonId, ctx: &mut ModelContext<'_>) -> ModelResult<bool> {
        let household = ctx.data.persons.get(person)?.household;
        let Some(home) = Self::home_zone(ctx, household)? else {
            ctx.issues.increment(IssueKind::MissingRecord, format!("{household} has no dwelling"));
            return Ok(false);
        };

        let vacant = ctx.data.vacant_jobs();
        if vacant.is_empty() {
            ctx.issues.increment(IssueKind::NoVacantJob, person);
            return Ok(false);
        }
        let mut weights = Vec::with_capacity(vacant.len());
        for job in &vacant {
            let zone = ctx.data.jobs.get(*job)?.location.zone();
            let minutes = ctx.travel.travel_time(
                Location::Zone(home),
                Location::Zone(zone),
                COMMUTE_DEPARTURE_SECS,
                Mode::Car,
            )?;
            weights.push((-self.beta * minutes).exp());
        }
        let Some(pick) = choose_weighted(ctx.rng, &weights) else {
            ctx.issues.increment(IssueKind::ZeroProbability, format!("job choice for {person}"));
            return Ok(false);
        };

        ctx.data.assign_job(person, vacant[pick])?;
        let p = ctx.data.persons.get_mut(person)?;
        p.income = p.income.max(self.starting_wage);
        Ok(true)
    }
}

impl EventModel for EmploymentModel {
    fn prepare_year(&mut self, _: Year, data: &DataContainer, rng: &mut SimRng) -> ModelResult<Vec<Event>> {
        let mut events = Vec::new();
        for p in data.persons.iter() {
            let draw = if p.is_employed() {
                rng.gen_bool(self.quit_rate)
            } else {
                p.is_working_age() && rng.gen_bool(self.search_rate)
            };
            if draw {
                events.push(Event::person(EventType::Employment, p.id));
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
        if person.is_employed() {
            ctx.data.release_job(id)?;
            let p = ctx.data.persons.get_mut(id)?;
            p.income *= self.replacement;
            Ok(true)
        } else {
            self.find_job(id, ctx)
        }
    }
}
